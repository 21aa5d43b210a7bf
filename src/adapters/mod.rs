//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | ButtonPort         | Push-button GPIO         |
//! |                | PwmPort            | MCPWM LED bank           |
//! | `log_sink`     | EventSink          | Serial log output        |

pub mod hardware;
pub mod log_sink;
