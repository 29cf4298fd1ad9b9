//! Git version control for the schedule file
//!
//! Every save can become a commit, so the repository history doubles as the
//! change log for orders and holiday rules. Repositories without an
//! `origin` remote are committed to locally and never pulled or pushed.

use anyhow::{Context, Result, bail};
use git2::{Repository, Signature, Time};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

const REMOTE_NAME: &str = "origin";

/// Git repository that holds the schedule file, if any
pub struct GitOps {
    repo: Option<Mutex<Repository>>,
}

impl GitOps {
    /// Discover the repository enclosing `file_path`
    pub fn new(file_path: &Path) -> Self {
        let dir = match file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let repo = match Repository::discover(dir) {
            Ok(repo) => {
                tracing::debug!("Schedule file is tracked by git: {}", dir.display());
                Some(Mutex::new(repo))
            }
            Err(e) => {
                tracing::debug!("No git repository for {}: {}", dir.display(), e);
                None
            }
        };
        Self { repo }
    }

    /// True if the schedule file lives inside a git repository
    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    fn lock(&self) -> Option<MutexGuard<'_, Repository>> {
        self.repo
            .as_ref()
            .map(|r| r.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn current_branch(repo: &Repository) -> Result<String> {
        let head = repo.head().context("Failed to get HEAD")?;
        Ok(head
            .shorthand()
            .context("HEAD does not point to a branch")?
            .to_string())
    }

    fn has_remote(repo: &Repository) -> bool {
        repo.find_remote(REMOTE_NAME).is_ok()
    }

    /// Fast-forward the current branch from the remote
    ///
    /// Diverged histories are not merged automatically.
    pub fn pull(&self) -> Result<()> {
        let Some(repo) = self.lock() else {
            return Ok(());
        };
        if !Self::has_remote(&repo) {
            tracing::debug!("No '{}' remote, skipping pull", REMOTE_NAME);
            return Ok(());
        }

        let branch = Self::current_branch(&repo)?;
        let mut remote = repo.find_remote(REMOTE_NAME)?;
        remote
            .fetch(&[&branch], None, None)
            .with_context(|| format!("Failed to fetch {} from {}", branch, REMOTE_NAME))?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }
        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{}", branch);
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(fetch_commit.id(), "ordercal: fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            tracing::info!("Fast-forwarded {} to {}", branch, fetch_commit.id());
            return Ok(());
        }
        bail!(
            "Branch '{}' has diverged from {}; merge it manually before saving again",
            branch,
            REMOTE_NAME
        )
    }

    /// Stage `file_path` and commit it with `message`
    pub fn commit(&self, file_path: &Path, message: &str) -> Result<()> {
        let Some(repo) = self.lock() else {
            return Ok(());
        };

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        let absolute = file_path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", file_path.display()))?;
        let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
        let relative = absolute
            .strip_prefix(&workdir)
            .context("Schedule file is outside the repository working directory")?;

        let mut index = repo.index()?;
        index.add_path(relative)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        if let Some(parent) = &parent
            && parent.tree_id() == tree.id()
        {
            tracing::debug!("Nothing changed, skipping commit '{}'", message);
            return Ok(());
        }

        let signature = Self::signature(&repo)?;
        let parents: Vec<_> = parent.iter().collect();
        let oid = repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        tracing::info!("Committed {}: {}", oid, message);
        Ok(())
    }

    /// Push the current branch to the remote
    pub fn push(&self) -> Result<()> {
        let Some(repo) = self.lock() else {
            return Ok(());
        };
        if !Self::has_remote(&repo) {
            tracing::debug!("No '{}' remote, skipping push", REMOTE_NAME);
            return Ok(());
        }

        let branch = Self::current_branch(&repo)?;
        let mut remote = repo.find_remote(REMOTE_NAME)?;
        let refspec = format!("refs/heads/{}", branch);
        remote
            .push(&[&refspec], None)
            .with_context(|| format!("Failed to push {} to {}", branch, REMOTE_NAME))?;
        tracing::info!("Pushed {} to {}", branch, REMOTE_NAME);
        Ok(())
    }

    /// Author from the repository config, falling back to the server name
    fn signature(repo: &Repository) -> Result<Signature<'static>> {
        let config = repo.config()?;
        let name = config
            .get_string("user.name")
            .unwrap_or_else(|_| "ordercal-mcp".to_string());
        let email = config
            .get_string("user.email")
            .unwrap_or_else(|_| "ordercal-mcp@localhost".to_string());

        match Signature::now(&name, &email) {
            Ok(sig) => Ok(sig),
            Err(_) => Signature::new(&name, &email, &Time::new(1_700_000_000, 0))
                .context("Failed to create commit signature"),
        }
    }

    /// Pull, commit and push in one step
    pub fn sync(&self, file_path: &Path, message: &str) -> Result<()> {
        if !self.is_git_managed() {
            return Ok(());
        }
        self.pull().context("Failed to pull changes")?;
        self.commit(file_path, message)
            .context("Failed to commit changes")?;
        self.push().context("Failed to push changes")?;
        Ok(())
    }
}
