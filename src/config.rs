use std::path::PathBuf;

pub const OUTPUT_FILE: &str = "books.json";

/// Resolved parameters for one catalog run. Nothing here persists between
/// runs; every invocation recomputes the catalog from the pages on disk.
#[derive(Debug, Clone)]
pub struct Config {
    pub source_dir: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    /// A relative output path is anchored to the source directory, so
    /// pointing the tool at a site folder keeps the catalog next to its
    /// pages.
    pub fn new(source_dir: PathBuf, output: PathBuf) -> Config {
        let output_path = if output.is_absolute() {
            output
        } else {
            source_dir.join(output)
        };
        Config {
            source_dir,
            output_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_output_lands_in_source_dir() {
        let config = Config::new(PathBuf::from("site"), PathBuf::from(OUTPUT_FILE));
        assert_eq!(config.output_path, PathBuf::from("site/books.json"));
    }

    #[test]
    fn absolute_output_is_kept() {
        let config = Config::new(PathBuf::from("site"), PathBuf::from("/tmp/out.json"));
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.json"));
    }
}
