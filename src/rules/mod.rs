// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule engine module for commit validation.
//!
//! Every commit is run through one rule per [`RuleCategory`], in a fixed
//! order. Rules never stop at the first violation; each returns an
//! outcome that is recorded in the verification result.

mod category;
mod content;
mod directory;
mod engine;
mod identity;
mod issues;
mod message;

pub use category::{RuleCategory, RuleOutcome};
pub use content::{ContentDiffRule, ContentSizeRule};
pub use directory::{KnownEmailRule, KnownNameRule};
pub use engine::{Rule, RuleContext, RuleSet};
pub use identity::{EmailMatchRule, NameMatchRule, Role};
pub use issues::IssueQueryRule;
pub use message::MessageGroupsRule;
