//! External service integrations.

pub mod switchtransact_client {
    pub use crate::switchtransact_client::*;
}
