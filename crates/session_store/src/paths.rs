use std::path::{Path, PathBuf};

pub const SESSION_DIR: &str = ".smart-energy-admin";
pub const SESSION_FILE_NAME: &str = "session.json";

#[must_use]
pub fn session_root(home: &Path) -> PathBuf {
    home.join(SESSION_DIR)
}

#[must_use]
pub fn session_file_path(home: &Path) -> PathBuf {
    session_root(home).join(SESSION_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_file_lives_under_hidden_dir() {
        let path = session_file_path(Path::new("/home/admin"));
        assert_eq!(
            path,
            PathBuf::from("/home/admin/.smart-energy-admin/session.json")
        );
    }
}
