// External collaborators, specified as contracts: the resume optimizer, the
// credit/subscription service, and the draft snapshot store. The layout core
// never touches any of these.

pub mod credits;
pub mod drafts;
pub mod optimizer;
