//! Headless page enhancements.
//!
//! A [`Page`] hosts a parsed document with virtual time, a viewport and
//! event dispatch. [`initialize`] attaches the stock behaviors to it: submit
//! feedback, click ripples, phone formatting, smooth anchor scrolling, a
//! typewriter heading, stat counters, reveal-on-scroll and search-mode
//! detection.

pub mod animation;
pub mod config;
pub mod controls;
pub mod error;
pub mod event;
pub mod features;
pub mod observer;
pub mod page;
pub mod scheduler;
pub mod viewport;

mod enhancer;

pub use crate::config::EnhancerConfig;
pub use crate::enhancer::{Enhancements, initialize};
pub use crate::error::{ConfigError, EnhanceError};
pub use crate::event::{DispatchOutcome, EventKind};
pub use crate::page::Page;
pub use crate::viewport::{Rectangle, ScrollBehavior};
