//! Database query functions organized by domain.

pub mod collabs;
pub mod communications;
pub mod memberships;
pub mod periods;
pub mod profiles;
pub mod selections;
pub mod sponsors;
pub mod submissions;
pub mod templates;
