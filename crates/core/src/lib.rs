// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tally-core: data model, events, effects and contribution policy for the
//! tally counter service.

pub mod macros;

pub mod denylist;
pub mod effect;
pub mod event;
pub mod heuristic;
pub mod id;
pub mod log;
pub mod path;
pub mod paths;
pub mod policy;
pub mod submission;
pub mod template;
pub mod write;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use denylist::Denylist;
pub use effect::Effect;
pub use event::Event;
pub use heuristic::{is_vandalism, mapping_speed, DEFAULT_MIN_SECONDS_PER_TASK};
pub use id::{EventId, GroupId, MembershipId, ProjectId, UserGroupId, UserId};
pub use log::{format_fields, LogContext};
pub use path::{DbPath, PathError};
pub use policy::{Policy, ProjectInfo, Rejection, DEFAULT_VALIDATE_PROJECT_TYPE};
pub use submission::{Malformed, Submission};
pub use template::{Params, PathTemplate};
pub use write::{Change, Op, Write};
