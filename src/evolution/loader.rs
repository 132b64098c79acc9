//! # Config file loader
//!
//! Reads a [`GaConfig`] from the line-oriented text format: one `key value...`
//! command per line, `#` starting a comment. Commands apply in file order on
//! top of the defaults, so a later `ga` line resets the selection and
//! replacement chosen by an earlier one.
//!
//! ```text
//! # travelling salesman run
//! datatype     int_perm
//! chrom_len    20
//! pool_size    200
//! ga           steady_state
//! crossover    pmx
//! mutation     swap
//! mu_rate      0.1
//! stop_after   5000 ignore_convergence
//! ```
//!
//! A malformed or unknown line is logged with `warn!` and skipped. A name
//! that no operator registry knows is an error.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, warn};

use super::config::{GaConfig, InitPool, ReportLevel, Strategy};
use crate::chromosome::DataType;
use crate::error::{Result, ResultExt};

enum Line {
    Applied,
    Skipped(&'static str),
}

fn parse<T: FromStr>(args: &[&str]) -> Option<T> {
    args.first().and_then(|s| s.parse().ok())
}

impl GaConfig {
    /// Reads a configuration from `reader`, starting from the defaults.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Io` if reading fails and
    /// `GeneticError::UnknownOperator` for an unknown operator name.
    pub fn from_reader<R: Read>(reader: R) -> Result<GaConfig> {
        let mut config = GaConfig::default();
        config.read_into(reader)?;
        Ok(config)
    }

    /// Opens `path` and reads it with [`GaConfig::from_reader`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<GaConfig> {
        let path = path.as_ref();
        let file =
            File::open(path).context(format!("Failed to open config file {}", path.display()))?;
        GaConfig::from_reader(file)
    }

    /// Applies the commands read from `reader` on top of this configuration.
    pub fn read_into<R: Read>(&mut self, reader: R) -> Result<()> {
        for (number, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let content = line.split('#').next().unwrap_or("");
            let tokens: Vec<&str> = content.split_whitespace().collect();
            let Some((&key, args)) = tokens.split_first() else {
                continue;
            };
            match self.apply_command(key, args)? {
                Line::Applied => debug!(line = number + 1, key, "Applied config command"),
                Line::Skipped(reason) => {
                    warn!(line = number + 1, content = content.trim(), reason, "Skipping config line")
                }
            }
        }
        Ok(())
    }

    fn apply_command(&mut self, key: &str, args: &[&str]) -> Result<Line> {
        let first = args.first().copied();
        match key {
            "bias" => match parse(args) {
                Some(v) => self.bias = v,
                None => return Ok(Line::Skipped("Invalid bias response")),
            },
            "chrom_len" => match parse(args) {
                Some(v) => self.chrom_len = v,
                None => return Ok(Line::Skipped("Invalid chrom_len response")),
            },
            "crossover" => match first {
                Some(name) => self.select_crossover(name)?,
                None => return Ok(Line::Skipped("Invalid crossover response")),
            },
            "datatype" => match first.and_then(|s| DataType::from_str(s).ok()) {
                Some(datatype) => self.datatype = datatype,
                None => return Ok(Line::Skipped("Invalid datatype response")),
            },
            "elitism" => match first {
                Some("true") => self.elitist = true,
                Some("false") => self.elitist = false,
                _ => return Ok(Line::Skipped("Invalid elitism response")),
            },
            "gap" => match parse(args) {
                Some(v) => self.gap = v,
                None => return Ok(Line::Skipped("Invalid gap response")),
            },
            "ga" => match first {
                Some(name) => self.use_strategy(Strategy::from_str(name)?)?,
                None => return Ok(Line::Skipped("Invalid ga response")),
            },
            "initpool" => match (first, args.get(1).copied()) {
                (Some("random"), _) => self.init_pool = InitPool::Random,
                (Some("random01"), _) => self.init_pool = InitPool::Random01,
                (Some("from_file"), path) => {
                    self.init_pool = InitPool::FromFile(path.map(PathBuf::from).unwrap_or_default())
                }
                (Some("interactive"), _) => {
                    return Ok(Line::Skipped("Interactive pool entry is not supported"))
                }
                _ => return Ok(Line::Skipped("Invalid initpool response")),
            },
            "mutation" => match first {
                Some(name) => self.select_mutation(name)?,
                None => return Ok(Line::Skipped("Invalid mutation response")),
            },
            "mu_rate" => match parse(args) {
                Some(v) => self.mu_rate = v,
                None => return Ok(Line::Skipped("Invalid mu_rate response")),
            },
            "objective" => match first {
                Some("minimize") => self.minimize = true,
                Some("maximize") => self.minimize = false,
                _ => return Ok(Line::Skipped("Invalid objective response")),
            },
            "pool_size" => match parse(args) {
                Some(v) => self.pool_size = v,
                None => return Ok(Line::Skipped("Invalid pool_size response")),
            },
            "pert_range" => match parse(args) {
                Some(v) => self.pert_range = v,
                None => return Ok(Line::Skipped("Invalid pert_range response")),
            },
            "replacement" => match first {
                Some(name) => self.select_replacement(name)?,
                None => return Ok(Line::Skipped("Invalid replacement response")),
            },
            "rp_interval" => match parse(args) {
                Some(v) => self.report_interval = v,
                None => return Ok(Line::Skipped("Invalid rp_interval response")),
            },
            "rp_type" => match first.and_then(|s| ReportLevel::from_str(s).ok()) {
                Some(level) => self.report_level = level,
                None => return Ok(Line::Skipped("Invalid rp_type response")),
            },
            "rand_seed" => match first {
                Some("my_pid") => self.rand_seed = u64::from(std::process::id()),
                _ => match parse(args) {
                    Some(v) => self.rand_seed = v,
                    None => return Ok(Line::Skipped("Invalid rand_seed response")),
                },
            },
            "selection" => match first {
                Some(name) => self.select_selection(name)?,
                None => return Ok(Line::Skipped("Invalid selection response")),
            },
            "stop_after" => match (first, args.get(1).copied()) {
                (Some("convergence"), None) => {
                    self.use_convergence = true;
                    self.max_iter = None;
                }
                (Some(count), flag) => match count.parse::<usize>() {
                    Ok(n) if n >= 1 => {
                        self.max_iter = Some(n);
                        self.use_convergence = flag != Some("ignore_convergence");
                    }
                    _ => return Ok(Line::Skipped("Invalid number for stop_after")),
                },
                (None, _) => return Ok(Line::Skipped("Invalid stop_after response")),
            },
            "user_data" => match first {
                Some(_) => self.user_data = args.join(" "),
                None => return Ok(Line::Skipped("Invalid user_data response")),
            },
            "x_rate" => match parse(args) {
                Some(v) => self.x_rate = v,
                None => return Ok(Line::Skipped("Invalid x_rate response")),
            },
            _ => return Ok(Line::Skipped("Unknown config command")),
        }
        Ok(Line::Applied)
    }
}
