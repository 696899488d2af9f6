use rust_embed::RustEmbed;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(RustEmbed)]
#[folder = "bundled/"]
pub struct Bundled;

const EXAMPLE_THREAD: &str = "example_thread.txt";

#[derive(Debug)]
pub enum InputError {
    Empty,
    UnsupportedType(String),
    NotUtf8,
    Io(std::io::Error),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Empty => write!(f, "Please enter an email thread to summarize"),
            InputError::UnsupportedType(_) => write!(f, "Please upload a text file (.txt)"),
            InputError::NotUtf8 => write!(f, "The file is not valid UTF-8 text"),
            InputError::Io(e) => write!(f, "Could not read file: {e}"),
        }
    }
}

impl std::error::Error for InputError {}

impl From<std::io::Error> for InputError {
    fn from(e: std::io::Error) -> Self {
        InputError::Io(e)
    }
}

/// Reads a thread from a plain-text file. The content is returned as-is.
pub fn read_thread_file(path: impl AsRef<Path>) -> Result<String, InputError> {
    let path = path.as_ref();
    let mime = mime_guess::from_path(path).first_or_octet_stream();

    if mime != mime_guess::mime::TEXT_PLAIN {
        log::debug!("rejecting {} ({mime})", path.display());
        return Err(InputError::UnsupportedType(mime.to_string()));
    }

    String::from_utf8(fs::read(path)?).map_err(|_| InputError::NotUtf8)
}

pub fn require_thread(email_thread: &str) -> Result<&str, InputError> {
    if email_thread.trim().is_empty() {
        Err(InputError::Empty)
    } else {
        Ok(email_thread)
    }
}

pub fn example_thread() -> String {
    Bundled::get(EXAMPLE_THREAD)
        .map(|file| String::from_utf8_lossy(&file.data).into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reads_txt_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("thread.txt");
        let content = "From: a@example.com\r\n\r\n  body with trailing space \n";
        fs::write(&path, content).unwrap();

        assert_eq!(read_thread_file(&path).unwrap(), content);
    }

    #[test]
    fn test_rejects_other_types() {
        let dir = tempdir().unwrap();
        for name in ["thread.pdf", "thread.html", "thread"] {
            let path = dir.path().join(name);
            fs::write(&path, "From: a@example.com").unwrap();

            let error = read_thread_file(&path).unwrap_err();
            assert!(matches!(error, InputError::UnsupportedType(_)), "{name}");
            assert_eq!(error.to_string(), "Please upload a text file (.txt)");
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_thread_file(dir.path().join("absent.txt")),
            Err(InputError::Io(_))
        ));
    }

    #[test]
    fn test_require_thread() {
        assert!(matches!(require_thread(" \n\t"), Err(InputError::Empty)));
        assert_eq!(require_thread(" hi ").unwrap(), " hi ");
    }

    #[test]
    fn test_example_thread_is_bundled() {
        let example = example_thread();
        assert!(example.starts_with("From: john@example.com"));
        assert!(example.contains("Subject: Re: Project Status Update"));
    }
}
