//! Site folder management: diff planning, default assets, and applying
//! a plan to disk. The zettelkasten folder is never touched from here.

mod apply;
pub mod assets;
mod planner;

pub use apply::{ApplyError, ApplyOutcome, apply, delete_confirmed};
pub use planner::{
    IGNORE_FILE_NAME, PlanAction, PlanEntry, SitePlan, load_ignore_list, plan,
};
