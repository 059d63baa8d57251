//! Version freshness resolution.
//!
//! Three independent capabilities: querying the installed version of a tool,
//! probing preference-ordered remote candidates for the best installable
//! version, and discovering candidate lists from git tags or release pages.

pub mod candidates;
pub mod git_tags;
pub mod installed;
pub mod page;
pub mod probe;

pub use candidates::{
    compare_installed_and_latest_version, find_installable_version, same_version, Resolution,
};
pub use git_tags::last_git_tags;
pub use installed::{query_installed_version, query_version_script, CommandIndex, NONE_SENTINEL};
pub use page::latest_page_versions;
pub use probe::{ExistenceProbe, HttpProbe};
