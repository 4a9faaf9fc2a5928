//! Project seeding and issue synchronization
//!
//! Both populate actions are written to run repeatedly: seeding skips
//! projects that already exist, and the issue sync refreshes records in
//! place keyed on (project, issue number).

use tally_core::labels::{parse_labels, ParsedLabels};
use tally_core::LabelConfig;
use tally_db::{CreateIssue, CreateProject, Database, Project, UpdateIssue};
use tally_github::RemoteIssue;
use tracing::debug;

use crate::state::AppContext;

/// Outcome of one project seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Projects created this run
    pub created: usize,

    /// Projects that already existed
    pub existing: usize,
}

/// Outcome of one issue sync run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    /// Tracked projects visited
    pub projects: usize,

    /// Issues fetched from GitHub
    pub fetched: usize,

    /// Issue records created
    pub created: usize,

    /// Issue records refreshed
    pub updated: usize,

    /// Issues skipped because a bot opened them
    pub skipped_bots: usize,

    /// Pull requests skipped
    pub skipped_pull_requests: usize,

    /// Issues skipped for missing mentor or level labels
    pub skipped_unlabeled: usize,
}

impl SyncSummary {
    /// Total skipped issues
    pub fn skipped(&self) -> usize {
        self.skipped_bots + self.skipped_pull_requests + self.skipped_unlabeled
    }
}

/// Seed the project table from the configured repository list
///
/// Existing projects are left untouched, so the action can run repeatedly.
pub async fn populate_projects(ctx: &AppContext) -> anyhow::Result<SeedSummary> {
    let github = &ctx.config.github;
    let api_base = github.api_base();
    let html_base = github.html_base();

    let mut summary = SeedSummary::default();

    for name in &github.projects {
        if ctx.db.projects().find_by_name(name).await?.is_some() {
            summary.existing += 1;
            continue;
        }

        let project = ctx
            .db
            .projects()
            .create(CreateProject {
                name: name.clone(),
                api_url: format!("{}{}", api_base, name),
                html_url: format!("{}{}", html_base, name),
            })
            .await?;

        debug!(project = %project.name, "Created project record");
        summary.created += 1;
    }

    Ok(summary)
}

/// Mirror issues for every tracked project
pub async fn populate_issues(ctx: &AppContext) -> anyhow::Result<SyncSummary> {
    let mut summary = SyncSummary::default();

    let projects = ctx.db.projects().list_all().await?;
    summary.projects = projects.len();

    for project in &projects {
        let issues = ctx.github.list_all_issues(&project.name).await?;
        summary.fetched += issues.len();

        apply_project_issues(
            &ctx.db,
            &ctx.config.labels,
            &ctx.config.github.bot_login,
            project,
            issues,
            &mut summary,
        )
        .await?;
    }

    Ok(summary)
}

/// Apply one project's fetched issues to the database
async fn apply_project_issues(
    db: &Database,
    labels: &LabelConfig,
    bot_login: &str,
    project: &Project,
    issues: Vec<RemoteIssue>,
    summary: &mut SyncSummary,
) -> anyhow::Result<()> {
    for issue in issues {
        if issue.author == bot_login {
            debug!(project = %project.name, number = issue.number, "Skipping bot-authored issue");
            summary.skipped_bots += 1;
            continue;
        }

        if issue.is_pull_request {
            debug!(project = %project.name, number = issue.number, "Skipping pull request");
            summary.skipped_pull_requests += 1;
            continue;
        }

        let ParsedLabels {
            mentor,
            level,
            points,
            restricted,
        } = parse_labels(&issue.labels, labels);

        let (Some(mentor_name), Some(level)) = (mentor, level) else {
            debug!(project = %project.name, number = issue.number, "Skipping issue without mentor and level labels");
            summary.skipped_unlabeled += 1;
            continue;
        };

        if mentor_name.is_empty() {
            debug!(project = %project.name, number = issue.number, "Skipping issue with an empty mentor name");
            summary.skipped_unlabeled += 1;
            continue;
        }

        // Mentor labels may name users that are not registered yet; an
        // unresolved mentor never clears one stored earlier.
        let mentor_id = db
            .users()
            .find_by_username(&mentor_name)
            .await?
            .map(|user| user.id);

        match db
            .issues()
            .find_by_number(project.id, issue.number as i64)
            .await?
        {
            Some(existing) => {
                db.issues()
                    .update(
                        existing.id,
                        UpdateIssue {
                            title: issue.title,
                            level: level.as_str().to_string(),
                            points,
                            is_restricted: restricted,
                            mentor_id,
                        },
                    )
                    .await?;
                summary.updated += 1;
            }
            None => {
                db.issues()
                    .create(CreateIssue {
                        number: issue.number as i64,
                        project_id: project.id,
                        title: issue.title,
                        api_url: issue.api_url,
                        html_url: issue.html_url,
                        level: level.as_str().to_string(),
                        points,
                        is_restricted: restricted,
                        mentor_id,
                    })
                    .await?;
                summary.created += 1;
            }
        }
    }

    Ok(())
}
