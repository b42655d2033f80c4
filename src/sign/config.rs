//! Signer configuration and its validating builder.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	error::ConfigError,
	id::{Region, ServiceName},
};

/// Canonicalization switches that differ between services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningSettings {
	/// URI-encode each path segment twice. Every service except S3 expects this.
	pub double_encode_path: bool,
	/// Emit and sign the `x-amz-content-sha256` header when signing headers.
	pub content_sha256_header: bool,
}
impl Default for SigningSettings {
	fn default() -> Self {
		Self { double_encode_path: true, content_sha256_header: true }
	}
}

/// Scope and environment a [`Signer`](crate::sign::Signer) signs for.
#[derive(Clone, Debug)]
pub struct SignerConfig {
	region: Region,
	service: ServiceName,
	clock: Arc<dyn Clock>,
	settings: SigningSettings,
}
impl SignerConfig {
	/// Creates a configuration using the system clock and default settings.
	pub fn new(region: Region, service: ServiceName) -> Self {
		Self { region, service, clock: Arc::new(SystemClock), settings: SigningSettings::default() }
	}

	/// Starts a builder that validates raw identifiers.
	pub fn builder() -> SignerConfigBuilder {
		SignerConfigBuilder::default()
	}

	/// Region in the credential scope.
	pub fn region(&self) -> &Region {
		&self.region
	}

	/// Service name in the credential scope.
	pub fn service(&self) -> &ServiceName {
		&self.service
	}

	/// Time source for the signing instant.
	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.clock
	}

	/// Canonicalization switches.
	pub fn settings(&self) -> SigningSettings {
		self.settings
	}

	/// Overrides the time source.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Overrides the canonicalization switches.
	pub fn with_settings(mut self, settings: SigningSettings) -> Self {
		self.settings = settings;

		self
	}
}

/// Builder for [`SignerConfig`] values.
#[derive(Debug, Default)]
pub struct SignerConfigBuilder {
	/// Region name, validated on [`SignerConfigBuilder::build`].
	pub region: Option<String>,
	/// Service name, validated on [`SignerConfigBuilder::build`].
	pub service: Option<String>,
	/// Optional clock; defaults to [`SystemClock`].
	pub clock: Option<Arc<dyn Clock>>,
	/// Canonicalization switches.
	pub settings: SigningSettings,
}
impl SignerConfigBuilder {
	/// Sets the region.
	pub fn region(mut self, region: impl Into<String>) -> Self {
		self.region = Some(region.into());

		self
	}

	/// Sets the service name.
	pub fn service(mut self, service: impl Into<String>) -> Self {
		self.service = Some(service.into());

		self
	}

	/// Injects a clock, e.g. [`FixedClock`](crate::clock::FixedClock) in tests.
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);

		self
	}

	/// Toggles double URI-encoding of path segments; disable for S3.
	pub fn double_encode_path(mut self, enabled: bool) -> Self {
		self.settings.double_encode_path = enabled;

		self
	}

	/// Toggles the `x-amz-content-sha256` header.
	pub fn content_sha256_header(mut self, enabled: bool) -> Self {
		self.settings.content_sha256_header = enabled;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<SignerConfig, ConfigError> {
		let region = Region::new(self.region.ok_or(ConfigError::MissingRegion)?)?;
		let service = ServiceName::new(self.service.ok_or(ConfigError::MissingService)?)?;
		let config = SignerConfig::new(region, service).with_settings(self.settings);

		Ok(match self.clock {
			Some(clock) => config.with_clock(clock),
			None => config,
		})
	}
}
