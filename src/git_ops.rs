use anyhow::{Context, Result, anyhow};
use git2::{Repository, Signature, Time};
use std::path::Path;

/// Git version control for notes that live in a repository
///
/// Notes outside a repository are left alone: every operation becomes a no-op.
pub struct GitOps {
    repo: Option<Repository>,
}

impl GitOps {
    /// Open the repository that contains `note_path`, if any
    pub fn discover(note_path: &Path) -> Self {
        let dir = if note_path.is_file() {
            note_path.parent().unwrap_or(note_path)
        } else {
            note_path
        };
        Self {
            repo: Repository::discover(dir).ok(),
        }
    }

    /// Check if the note is under git version control
    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    /// Fast-forward the current branch from `origin`
    ///
    /// Diverged histories are reported as an error instead of merged.
    pub fn pull(&self) -> Result<()> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };

        let branch = current_branch(repo)?;
        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        remote
            .fetch(&[&branch], None, None)
            .context("Failed to fetch from origin")?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }
        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{}", branch);
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(fetch_commit.id(), "Fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            return Ok(());
        }

        Err(anyhow!(
            "Vault history has diverged from origin/{}; resolve it manually before running again",
            branch
        ))
    }

    /// Commit the current contents of `note_path`
    pub fn commit(&self, note_path: &Path, message: &str) -> Result<()> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        let absolute = note_path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", note_path.display()))?;
        let workdir = workdir
            .canonicalize()
            .context("Failed to resolve repository working directory")?;
        let relative = absolute
            .strip_prefix(&workdir)
            .context("Note is not inside the repository")?;

        let mut index = repo.index()?;
        index.add_path(relative)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let parent = match repo.head() {
            Ok(head) => {
                let oid = head.target().context("HEAD has no target")?;
                Some(repo.find_commit(oid)?)
            }
            Err(_) => None,
        };
        let parents: Vec<_> = parent.iter().collect();

        let signature = signature(repo)?;
        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        Ok(())
    }

    /// Push the current branch to `origin`
    pub fn push(&self) -> Result<()> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };

        let branch = current_branch(repo)?;
        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        remote.push(&[&format!("refs/heads/{}", branch)], None)?;
        Ok(())
    }

    /// Commit the note and push it, skipping the push when there is no `origin`
    pub fn publish(&self, note_path: &Path, message: &str) -> Result<()> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };

        self.commit(note_path, message)
            .context("Failed to commit note")?;
        if repo.find_remote("origin").is_ok() {
            self.push().context("Failed to push note")?;
        }
        Ok(())
    }
}

fn current_branch(repo: &Repository) -> Result<String> {
    let head = repo.head().context("Failed to get HEAD")?;
    Ok(head
        .shorthand()
        .context("Failed to get branch name")?
        .to_string())
}

/// Signature from the repository config, falling back to a tool identity
fn signature(repo: &Repository) -> Result<Signature<'static>> {
    let config = repo.config()?;
    let name = config
        .get_string("user.name")
        .unwrap_or_else(|_| "taskvault".to_string());
    let email = config
        .get_string("user.email")
        .unwrap_or_else(|_| "taskvault@localhost".to_string());

    match Signature::now(&name, &email) {
        Ok(sig) => Ok(sig),
        Err(_) => {
            let time = Time::new(1_700_000_000, 0);
            Signature::new(&name, &email, &time).context("Failed to create signature")
        }
    }
}
