//! # Block Bank API
//!
//! REST surface over the pricing rules and the simulated chain.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 axum Router                  │
//! │  /credit-tier /loan-conditions /quote  ...   │
//! │  /loans /transactions/:hash  ...             │
//! └───────┬──────────────────────────┬───────────┘
//!         │                          │
//!  ┌──────┴───────┐          ┌───────┴────────┐
//!  │ QuoteEngine  │          │ LoanService /  │
//!  │ (pure rules) │          │ SimulatedChain │
//!  └──────────────┘          └────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
