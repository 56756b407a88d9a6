use crate::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use rocket::serde::{Serialize, Deserialize};


/// Name of the config file in the app's folder
pub const FILENAME: &'static str = "halide.config";


/// The app's config
#[allow(non_snake_case)]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// IP address to serve on.
    /// Default : 127.0.0.1
    #[serde(default="config_default_address")]
    pub ADDRESS: String,

    /// Port to serve on.
    /// Default : 8000
    #[serde(default="config_default_port")]
    pub PORT: u16,

    /// Title displayed in the page title and the top of the gallery.
    #[serde(default="config_default_title")]
    pub TITLE: String,

    /// Path to the SQLite database file.
    /// Default : "halide.sqlite" in the app's folder
    #[serde(default="config_default_database_path")]
    pub DATABASE_PATH: String,

    /// Path to the directory where uploaded files are stored, default is
    /// `uploads/` in the app's folder. Write access is required; the
    /// directory is created if it doesn't exist.
    #[serde(default="config_default_uploads_dir")]
    pub UPLOADS_DIR: String,

    /// Key used to sign the session cookie that flash messages travel in.
    /// Default : a hardcoded development-only value. Any deployment reachable
    /// from the outside needs its own key here.
    #[serde(default="config_default_secret_key")]
    pub SECRET_KEY: String,
}

impl Default for Config {
    fn default() -> Self {
        // An empty TOML document gives every field its serde default
        toml::from_str("").unwrap()
    }
}

impl Config {

    /// Read the config file and deserialize it into a Config struct.
    /// A missing file is not an error : every key has a default.
    pub fn read() -> Result<Self, Error> {
        match Self::read_path_as_string(FILENAME) {
            Ok(content) => Ok(toml::from_str(content.as_str())?),
            Err(Error::FileError(error, _)) if error.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(error),
        }
    }

    /// Try to read and parse the config file
    /// In case of error, print it to stderr and exit with a status code of -1
    pub fn read_or_exit() -> Self {
        Self::read()
            .unwrap_or_else(|e| match e {
                Error::FileError(error, path) => {
                    eprintln!("Error, unable to open the config file \"{}\" : {}", path.display(), error);
                    std::process::exit(-1);
                }
                Error::TomlParserError(error) => {
                    eprintln!("Error, unable to parse the config file \"{}\" : {}", FILENAME, error);
                    std::process::exit(-1);
                }
                _ => std::process::exit(-1),
            })
    }

    /// Read the config file at the given location and return it as a simple String
    pub fn read_path_as_string<P>(path: P) -> Result<String, Error>
        where P: AsRef<Path>
    {
        fs::read_to_string(&path)
            .map_err(|e| Error::FileError(e, PathBuf::from(path.as_ref())))
    }

}


// Default values for config keys

fn config_default_address() -> String {
    "127.0.0.1".to_string()
}

fn config_default_port() -> u16 {
    8000
}

fn config_default_title() -> String {
    "Halide".to_string()
}

fn config_default_database_path() -> String {
    "halide.sqlite".to_string()
}

fn config_default_uploads_dir() -> String {
    "uploads".to_string()
}

fn config_default_secret_key() -> String {
    // Development-only value, only here so the app can start without a
    // config file
    "gc+nli7JZA1jz9pYaPB9XJE55uTLEz9u7JcGzLAGxm4=".to_string()
}
