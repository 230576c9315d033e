//! Adventurers and the parties they travel in

pub mod class;
pub mod group;
pub mod member;

pub use class::{AdventurerClass, AdventurerTrait, ClassStats, Skill, SkillEffect};
pub use group::{mint_token, Party, PartyKind};
pub use member::{Member, MemberTemplate};
