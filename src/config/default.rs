// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Default configuration values.

/// Generate an example configuration file.
pub fn example_config() -> &'static str {
    r#"# refcheck Configuration File
# Author: Eshan Roy
# SPDX-License-Identifier: MIT

# Branch selection
[branches]
include = "^refs/heads/"
reject = "^refs/heads/(tmp|wip)/"

# Identity and content rules
[rules]
require_matching_author_email = true
require_matching_committer_email = false
require_matching_author_name = false
require_matching_committer_name = false
max_file_size_kb = 1024
size_exclude = ["*.lock"]
reject_diff_pattern = "AKIA[0-9A-Z]{16}"
require_author_email_in_directory = true
require_author_name_in_directory = false

# Commit message groups
[[rules.groups]]
match = "one"
message = "Commit message must reference an issue"

[[rules.groups.rules]]
pattern = "\\b[A-Z][A-Z0-9_]+-[0-9]+\\b"
message = "Issue key, e.g. PROJ-123"

[[rules.groups]]
match = "none"
message = "Work in progress commits are not accepted"

[[rules.groups.rules]]
pattern = "^(?i)wip\\b"
message = "Message starts with WIP"

[[rules.issue_queries]]
query = "issue in ({{issue_keys}}) AND status = \"In Progress\""
message = "{{commit.short_id}} references no issue in progress"

# Change set exclusions
[exclusions]
exclude_merge_commits = true
exclude_commit_pattern = "^Merge branch"

# Report
[report]
accept_message = "All commits accepted"
reject_message = "Push rejected for {{pusher.name}} <{{pusher.email}}>"
dry_run = false

# Known users
[directory]
users_file = "users.toml"

# Issue tracker command, receives the query as its last argument
[issue_tracker]
command = "jira-search"
args = ["--format", "keys"]
"#
}
