//! App builder - constructs and runs the Eventum application

use std::sync::Arc;

use crate::abac::{OwnerPolicy, WritePolicy};
use crate::auth_adapter::AuthAdapter;
use crate::meta_adapter::MetaAdapter;
use crate::prelude::*;
use crate::routes;
pub use eventum_core::app::{Adapters, App, AppBuilderOpts, AppState, VERSION};

pub struct AppBuilder {
	opts: AppBuilderOpts,
	write_policy: Option<Arc<dyn WritePolicy>>,
	adapters: Adapters,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be installed (several apps in one test binary)
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder {
			opts: AppBuilderOpts { listen: "127.0.0.1:8000".into() },
			write_policy: None,
			adapters: Adapters { auth_adapter: None, meta_adapter: None },
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn write_policy(&mut self, write_policy: Arc<dyn WritePolicy>) -> &mut Self {
		self.write_policy = Some(write_policy);
		self
	}

	// Adapters
	pub fn auth_adapter(&mut self, auth_adapter: Arc<dyn AuthAdapter>) -> &mut Self {
		self.adapters.auth_adapter = Some(auth_adapter);
		self
	}
	pub fn meta_adapter(&mut self, meta_adapter: Arc<dyn MetaAdapter>) -> &mut Self {
		self.adapters.meta_adapter = Some(meta_adapter);
		self
	}

	/// Assembles the shared application state.
	///
	/// The write policy defaults to [`OwnerPolicy`]. Both adapters are
	/// mandatory.
	pub fn build(self) -> ClResult<App> {
		let Some(auth_adapter) = self.adapters.auth_adapter else {
			error!("FATAL: No auth adapter configured");
			return Err(Error::ConfigError("No auth adapter configured".into()));
		};
		let Some(meta_adapter) = self.adapters.meta_adapter else {
			error!("FATAL: No meta adapter configured");
			return Err(Error::ConfigError("No meta adapter configured".into()));
		};
		let write_policy = self.write_policy.unwrap_or_else(|| Arc::new(OwnerPolicy));

		Ok(Arc::new(AppState {
			opts: self.opts,
			write_policy,
			auth_adapter,
			meta_adapter,
		}))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("     ______               __");
		info!("    / ____/   _____  ____/ /___  ______ ___");
		info!("   / __/ | | / / _ \\/ __  / __/ / / / __ `__ \\");
		info!("  / /___ | |/ /  __/ / / / /_/ /_/ / / / / / /");
		info!(" /_____/ |___/\\___/_/ /_/\\__/\\__,_/_/ /_/ /_/  V{}", VERSION);
		info!("");

		let app = self.build()?;
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.inspect_err(
			|err| error!("FATAL: Cannot listen on {}: {}", app.opts.listen, err),
		)?;
		info!("Listening on http://{}", app.opts.listen);

		axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

		info!("Server stopped");
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => info!("Shutdown signal received"),
		Err(err) => {
			warn!("Cannot listen for shutdown signal: {}", err);
			std::future::pending::<()>().await;
		}
	}
}

// vim: ts=4
