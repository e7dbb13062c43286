pub mod member;
pub mod member_team;
pub mod team;

// Re-export core models for easy access
pub use member::{Member, NewMember};
pub use member_team::MemberTeamRow;
pub use team::Team;
