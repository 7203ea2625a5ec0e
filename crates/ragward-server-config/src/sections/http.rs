// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP listener configuration.

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
	pub base_url: String,
	/// Origins allowed by CORS; empty means same-origin only, `*` allows any.
	pub cors_allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
	fn default() -> Self {
		HttpConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub cors_allowed_origins: Option<Vec<String>>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: HttpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.cors_allowed_origins.is_some() {
			self.cors_allowed_origins = other.cors_allowed_origins;
		}
	}

	pub fn finalize(self) -> HttpConfig {
		let host = self.host.unwrap_or_else(|| "0.0.0.0".to_string());
		let port = self.port.unwrap_or(8080);
		let base_url = self
			.base_url
			.unwrap_or_else(|| format!("http://localhost:{port}"));
		HttpConfig {
			host,
			port,
			base_url: base_url.trim_end_matches('/').to_string(),
			cors_allowed_origins: self.cors_allowed_origins.unwrap_or_default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = HttpConfig::default();
		assert_eq!(config.host, "0.0.0.0");
		assert_eq!(config.port, 8080);
		assert_eq!(config.base_url, "http://localhost:8080");
		assert!(config.cors_allowed_origins.is_empty());
	}

	#[test]
	fn test_base_url_follows_port_and_drops_trailing_slash() {
		let config = HttpConfigLayer {
			port: Some(9000),
			..Default::default()
		}
		.finalize();
		assert_eq!(config.base_url, "http://localhost:9000");

		let config = HttpConfigLayer {
			base_url: Some("https://rag.example.com/".to_string()),
			..Default::default()
		}
		.finalize();
		assert_eq!(config.base_url, "https://rag.example.com");
	}
}
