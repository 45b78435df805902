//! Environment-driven server configuration.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Which case to serve and where to find it.
#[derive(Debug, Clone)]
pub struct ServerConfig {
	/// HTTP port.
	pub port: u16,
	/// Directory holding one sub-directory per case.
	pub cases_dir: PathBuf,
	/// Slug of the case this process serves.
	pub case: String,
	/// Static assets (wasm bundle, graph stylesheet).
	pub static_dir: PathBuf,
}

impl ServerConfig {
	/// Reads `DEEPTRACE_CASES_DIR`, `DEEPTRACE_CASE`, `DEEPTRACE_STATIC_DIR`
	/// and `PORT`.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let case = get("DEEPTRACE_CASE")
			.filter(|c| !c.trim().is_empty())
			.ok_or_else(|| Error::Config("DEEPTRACE_CASE is not set".into()))?;
		if case.contains(['/', '\\']) || case == ".." {
			return Err(Error::Config(format!("invalid case slug '{case}'")));
		}

		let port = match get("PORT") {
			Some(p) => p
				.parse()
				.map_err(|_| Error::Config(format!("invalid PORT '{p}'")))?,
			None => 8080,
		};

		Ok(Self {
			port,
			cases_dir: get("DEEPTRACE_CASES_DIR")
				.map(PathBuf::from)
				.unwrap_or_else(|| "cases".into()),
			case,
			static_dir: get("DEEPTRACE_STATIC_DIR")
				.map(PathBuf::from)
				.unwrap_or_else(|| "static".into()),
		})
	}

	/// `<cases_dir>/<case>`.
	pub fn case_dir(&self) -> PathBuf {
		self.cases_dir.join(&self.case)
	}

	/// `<cases_dir>/<case>/case.db`.
	pub fn database_path(&self) -> PathBuf {
		case_database(&self.cases_dir, &self.case)
	}
}

/// Location of a case database.
pub fn case_database(cases_dir: &Path, case: &str) -> PathBuf {
	cases_dir.join(case).join("case.db")
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |key| vars.get(key).cloned()
	}

	#[test]
	fn defaults() {
		let config = ServerConfig::from_lookup(lookup(&[("DEEPTRACE_CASE", "test-case")])).unwrap();
		assert_eq!(config.port, 8080);
		assert_eq!(config.database_path(), PathBuf::from("cases/test-case/case.db"));
		assert_eq!(config.static_dir, PathBuf::from("static"));
	}

	#[test]
	fn case_is_required() {
		assert!(matches!(ServerConfig::from_lookup(lookup(&[])), Err(Error::Config(_))));
		assert!(ServerConfig::from_lookup(lookup(&[("DEEPTRACE_CASE", "  ")])).is_err());
	}

	#[test]
	fn rejects_path_like_slugs_and_bad_ports() {
		assert!(ServerConfig::from_lookup(lookup(&[("DEEPTRACE_CASE", "../etc")])).is_err());
		assert!(
			ServerConfig::from_lookup(lookup(&[("DEEPTRACE_CASE", "a"), ("PORT", "http")])).is_err()
		);
	}
}
