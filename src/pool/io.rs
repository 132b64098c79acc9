use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::warn;

use super::Pool;
use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result, ResultExt};

/// Numeric tokens of a pool file: `#` comments run to the end of the line
/// and a token starting with `q` or `Q` ends the input.
fn tokens<R: Read>(reader: R) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("");
        for token in content.split_whitespace() {
            if token.starts_with(['q', 'Q']) {
                return Ok(values);
            }
            match token.parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => warn!(token, "Skipping non-numeric token in pool input"),
            }
        }
    }
    Ok(values)
}

impl Pool {
    /// Reads a pool in the whitespace-separated token format: the first
    /// number is the chromosome length, then genes follow chromosome after
    /// chromosome.
    ///
    /// A trailing chromosome with missing genes is dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if no valid length is read.
    pub fn read_from<R: Read>(reader: R) -> Result<Pool> {
        let values = tokens(reader)?;
        let (&first, genes) = values.split_first().ok_or_else(|| {
            GeneticError::Configuration("No chromosome length was read".to_string())
        })?;
        if first < 1.0 || first.fract() != 0.0 {
            return Err(GeneticError::Configuration(format!(
                "Invalid chromosome length {} in pool input",
                first
            )));
        }
        let len = first as usize;

        let mut pool = Pool::with_capacity(genes.len() / len);
        let mut chunks = genes.chunks_exact(len);
        for chunk in chunks.by_ref() {
            pool.append(Chromosome::from_genes(chunk.to_vec())?);
        }
        let rest = chunks.remainder().len();
        if rest > 0 {
            warn!(
                read = rest,
                expected = len,
                "Premature end of input while reading chromosome"
            );
        }
        Ok(pool)
    }

    /// Opens `path` and reads it with [`Pool::read_from`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Pool> {
        let path = path.as_ref();
        let file = File::open(path).context(format!("Failed to open pool file {}", path.display()))?;
        Pool::read_from(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_comments_and_quit() {
        let input = "# a pool of three-gene chromosomes\n\
                     3\n\
                     1 2 3   # first\n\
                     3 1 2\n\
                     q\n\
                     2 3 1\n";
        let pool = Pool::read_from(input.as_bytes()).unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(0).unwrap().genes(), &[1.0, 2.0, 3.0]);
        assert_eq!(pool.get(1).unwrap().genes(), &[3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_truncated_chromosome_dropped() {
        let pool = Pool::read_from("4 1 2 3 4 4 3".as_bytes()).unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_real_genes() {
        let pool = Pool::read_from("2\n0.25 -1.5\n".as_bytes()).unwrap();
        assert_eq!(pool.get(0).unwrap().genes(), &[0.25, -1.5]);
    }

    #[test]
    fn test_missing_or_bad_length() {
        assert!(matches!(
            Pool::read_from("# nothing here\n".as_bytes()),
            Err(GeneticError::Configuration(_))
        ));
        assert!(Pool::read_from("2.5 1 2".as_bytes()).is_err());
        assert!(Pool::read_from("0".as_bytes()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Pool::load("/nonexistent/pool.txt"),
            Err(GeneticError::Other(_))
        ));
    }
}
