use super::assertions::Assertion;
use super::steps::ScenarioStep;
use super::workspace::TestWorkspace;
use anyhow::{anyhow, Context, Result};
use attn_core::{
    store_path, CleanupReport, ContentId, FacetName, FacetStore, Outcome, RefreshReport,
    RepositorySyncReport, StoreKind, SyncReport, Workspace,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Report of the most recent synchronizer step
#[derive(Debug)]
enum LastReport {
    Sync(Outcome<SyncReport>),
    Refresh(Outcome<RefreshReport>),
    Cleanup(Outcome<CleanupReport>),
    Repository(RepositorySyncReport),
}

/// Executes scenarios against a real tree on disk
pub struct ScenarioRunner {
    workspace: TestWorkspace,
    ws: Workspace,
    last: Option<LastReport>,
    baseline: HashMap<(String, String), ContentId>,
    current_step: usize,
}

impl ScenarioRunner {
    /// Create a new runner over a prepared tree
    pub fn new(workspace: TestWorkspace) -> Result<Self> {
        let ws = workspace.open()?;
        Ok(Self {
            workspace,
            ws,
            last: None,
            baseline: HashMap::new(),
            current_step: 0,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::WriteFile { path, content } => self.workspace.write_file(path, content),
            ScenarioStep::RemoveFile { path } => self.workspace.remove_file(path),
            ScenarioStep::WriteStore { dir, kind, content } => {
                self.handle_write_store(dir, *kind, content)
            }

            ScenarioStep::Sync { dir } => self.handle_sync(dir),
            ScenarioStep::SyncAll => self.handle_sync_all(),
            ScenarioStep::Refresh { dir } => self.handle_refresh(dir),
            ScenarioStep::Cleanup { dir } => self.handle_cleanup(dir),

            ScenarioStep::Assert { assertion } => self.handle_assertion(assertion),
        }
    }

    // ===== Step handlers =====

    fn handle_write_store(&self, dir: &str, kind: StoreKind, content: &str) -> Result<()> {
        let file = self.ws.config().store.file_name(kind);
        let path = if dir == "." {
            file.to_string()
        } else {
            format!("{}/{}", dir, file)
        };
        self.workspace.write_file(&path, content.as_bytes())
    }

    fn handle_sync(&mut self, dir: &str) -> Result<()> {
        let outcome = self.ws.synchronizer()?.sync(Path::new(dir))?;
        self.record_baseline(dir)?;
        self.last = Some(LastReport::Sync(outcome));
        Ok(())
    }

    fn handle_sync_all(&mut self) -> Result<()> {
        let report = self.ws.synchronizer()?.sync_repository()?;
        for dir in self.ws.scanner()?.discover_directories()? {
            self.record_baseline(&dir)?;
        }
        self.last = Some(LastReport::Repository(report));
        Ok(())
    }

    fn handle_refresh(&mut self, dir: &str) -> Result<()> {
        let outcome = self.ws.synchronizer()?.refresh_identities(Path::new(dir))?;
        self.last = Some(LastReport::Refresh(outcome));
        Ok(())
    }

    fn handle_cleanup(&mut self, dir: &str) -> Result<()> {
        let outcome = self.ws.synchronizer()?.cleanup(Path::new(dir))?;
        self.last = Some(LastReport::Cleanup(outcome));
        Ok(())
    }

    /// Remember the first identity seen for every file facet in `dir`
    fn record_baseline(&mut self, dir: &str) -> Result<()> {
        let Some(store) = self.load_store(dir)? else {
            return Ok(());
        };
        for facet in store.facets() {
            if let (Some(file), Some(id)) = (facet.name().filename(), facet.content_id()) {
                self.baseline
                    .entry((dir.to_string(), file.to_string()))
                    .or_insert(id);
            }
        }
        Ok(())
    }

    // ===== Assertion handlers =====

    fn handle_assertion(&self, assertion: &Assertion) -> Result<()> {
        match assertion {
            Assertion::FacetExists { dir, facet } => self.assert_facet_exists(dir, facet),
            Assertion::FacetMissing { dir, facet } => self.assert_facet_missing(dir, facet),
            Assertion::FacetValue {
                dir,
                facet,
                key,
                value,
            } => self.assert_facet_value(dir, facet, key, *value),
            Assertion::IdentityCurrent { dir, file } => self.assert_identity_current(dir, file),
            Assertion::IdentityChanged { dir, file } => self.assert_identity_changed(dir, file),

            Assertion::Created(n) => self.assert_count("created", self.created()?, *n),
            Assertion::Updated(n) => self.assert_count("updated", self.updated()?, *n),
            Assertion::Removed(n) => self.assert_count("removed", self.removed()?, *n),
            Assertion::Skipped(reason) => {
                let actual = self.skip_reason()?;
                if actual != Some(*reason) {
                    return Err(anyhow!("Expected skip {:?}, got {:?}", reason, actual));
                }
                Ok(())
            }
            Assertion::DirectoriesProcessed(n) => match &self.last {
                Some(LastReport::Repository(report)) => {
                    self.assert_count("directories", report.directories, *n)
                }
                other => Err(anyhow!("Last step was not a repository sync: {:?}", other)),
            },

            Assertion::ResolvedAttribute {
                path,
                facet,
                key,
                value,
            } => self.assert_resolved(StoreKind::Attributes, path, facet, key, *value),
            Assertion::ResolvedPriority {
                path,
                facet,
                key,
                value,
            } => self.assert_resolved(StoreKind::Priorities, path, facet, key, *value),
            Assertion::ResolvedLacksFacet { path, facet } => {
                self.assert_resolved_lacks(path, facet)
            }

            Assertion::UrgencySorted => self.assert_urgency_sorted(),
            Assertion::TopUrgency { facet, attribute } => self.assert_top_urgency(facet, attribute),
            Assertion::RankedItems(n) => {
                let rankings = self.ws.rankings()?;
                self.assert_count("ranked items", rankings.urgency.len(), *n)
            }

            Assertion::Custom(check) => check(&self.ws),
        }
    }

    fn assert_facet_exists(&self, dir: &str, facet: &str) -> Result<()> {
        let store = self.require_store(dir)?;
        if store.facet(&FacetName::parse(facet)).is_none() {
            return Err(anyhow!("Facet [{}] not found in {}", facet, dir));
        }
        Ok(())
    }

    fn assert_facet_missing(&self, dir: &str, facet: &str) -> Result<()> {
        if let Some(store) = self.load_store(dir)? {
            if store.facet(&FacetName::parse(facet)).is_some() {
                return Err(anyhow!("Facet [{}] unexpectedly present in {}", facet, dir));
            }
        }
        Ok(())
    }

    fn assert_facet_value(&self, dir: &str, facet: &str, key: &str, expected: f64) -> Result<()> {
        let store = self.require_store(dir)?;
        let actual = store
            .facet(&FacetName::parse(facet))
            .and_then(|f| f.get(key))
            .and_then(|v| v.as_number())
            .ok_or_else(|| anyhow!("No numeric {}.{} in {}", facet, key, dir))?;
        if (actual - expected).abs() > 1e-9 {
            return Err(anyhow!(
                "Expected {}.{} = {} in {}, got {}",
                facet,
                key,
                expected,
                dir,
                actual
            ));
        }
        Ok(())
    }

    fn assert_identity_current(&self, dir: &str, file: &str) -> Result<()> {
        let stored = self.stored_identity(dir, file)?;
        let rel = if dir == "." {
            file.to_string()
        } else {
            format!("{}/{}", dir, file)
        };
        let expected = ContentId::hash_blob(&self.workspace.read_file(&rel)?);
        if stored != expected {
            return Err(anyhow!(
                "Stored identity {} for {} does not match content hash {}",
                stored,
                rel,
                expected
            ));
        }
        Ok(())
    }

    fn assert_identity_changed(&self, dir: &str, file: &str) -> Result<()> {
        let stored = self.stored_identity(dir, file)?;
        let first = self
            .baseline
            .get(&(dir.to_string(), file.to_string()))
            .ok_or_else(|| anyhow!("No baseline identity recorded for {}/{}", dir, file))?;
        if stored == *first {
            return Err(anyhow!("Identity of {}/{} did not change", dir, file));
        }
        Ok(())
    }

    fn assert_count(&self, what: &str, actual: usize, expected: usize) -> Result<()> {
        if actual != expected {
            return Err(anyhow!("Expected {} {}, got {}", expected, what, actual));
        }
        Ok(())
    }

    fn assert_resolved(
        &self,
        kind: StoreKind,
        path: &str,
        facet: &str,
        key: &str,
        expected: f64,
    ) -> Result<()> {
        let data = self.ws.resolve()?;
        let tree = match kind {
            StoreKind::Attributes => &data.attributes,
            StoreKind::Priorities => &data.priorities,
        };
        let actual = tree
            .get(path)
            .and_then(|m| m.get(facet))
            .and_then(|m| m.get(key))
            .ok_or_else(|| anyhow!("{:?} view of {} lacks {}.{}", kind, path, facet, key))?;
        if (actual - expected).abs() > 1e-9 {
            return Err(anyhow!(
                "Expected {:?} {}.{} = {} at {}, got {}",
                kind,
                facet,
                key,
                expected,
                path,
                actual
            ));
        }
        Ok(())
    }

    fn assert_resolved_lacks(&self, path: &str, facet: &str) -> Result<()> {
        let data = self.ws.resolve()?;
        let present = data
            .attributes
            .get(path)
            .is_some_and(|m| m.contains_key(facet))
            || data
                .priorities
                .get(path)
                .is_some_and(|m| m.contains_key(facet));
        if present {
            return Err(anyhow!("Resolved view of {} unexpectedly has [{}]", path, facet));
        }
        Ok(())
    }

    fn assert_urgency_sorted(&self) -> Result<()> {
        let urgency = self.ws.rankings()?.urgency;
        if urgency.windows(2).any(|w| w[0].urgency < w[1].urgency) {
            return Err(anyhow!("Urgency ranking is not descending"));
        }
        Ok(())
    }

    fn assert_top_urgency(&self, facet: &str, attribute: &str) -> Result<()> {
        let urgency = self.ws.rankings()?.urgency;
        let top = urgency
            .first()
            .ok_or_else(|| anyhow!("Urgency ranking is empty"))?;
        if top.facet != facet || top.attribute != attribute {
            return Err(anyhow!(
                "Expected top item {}.{}, got {}.{}",
                facet,
                attribute,
                top.facet,
                top.attribute
            ));
        }
        Ok(())
    }

    // ===== Helper methods =====

    fn dir_path(&self, dir: &str) -> PathBuf {
        if dir == "." {
            self.ws.root().to_path_buf()
        } else {
            self.ws.root().join(dir)
        }
    }

    fn load_store(&self, dir: &str) -> Result<Option<FacetStore>> {
        let path = store_path(
            &self.dir_path(dir),
            &self.ws.config().store,
            StoreKind::Attributes,
        );
        Ok(FacetStore::load(&path)?)
    }

    fn require_store(&self, dir: &str) -> Result<FacetStore> {
        self.load_store(dir)?
            .ok_or_else(|| anyhow!("No attribute store in {}", dir))
    }

    fn stored_identity(&self, dir: &str, file: &str) -> Result<ContentId> {
        self.require_store(dir)?
            .facet(&FacetName::file(file))
            .and_then(|f| f.content_id())
            .ok_or_else(|| anyhow!("No identity stored for {}/{}", dir, file))
    }

    fn created(&self) -> Result<usize> {
        match &self.last {
            Some(LastReport::Sync(Outcome::Done(r))) => Ok(r.created),
            Some(LastReport::Repository(r)) => Ok(r.created),
            other => Err(anyhow!("No creation count in last report: {:?}", other)),
        }
    }

    fn updated(&self) -> Result<usize> {
        match &self.last {
            Some(LastReport::Sync(Outcome::Done(r))) => Ok(r.updated),
            Some(LastReport::Refresh(Outcome::Done(r))) => Ok(r.updated),
            Some(LastReport::Repository(r)) => Ok(r.updated),
            other => Err(anyhow!("No update count in last report: {:?}", other)),
        }
    }

    fn removed(&self) -> Result<usize> {
        match &self.last {
            Some(LastReport::Cleanup(Outcome::Done(r))) => Ok(r.removed),
            other => Err(anyhow!("No removal count in last report: {:?}", other)),
        }
    }

    fn skip_reason(&self) -> Result<Option<attn_core::SkipReason>> {
        match &self.last {
            Some(LastReport::Sync(o)) => Ok(o.skip_reason()),
            Some(LastReport::Refresh(o)) => Ok(o.skip_reason()),
            Some(LastReport::Cleanup(o)) => Ok(o.skip_reason()),
            other => Err(anyhow!("Last step has no outcome: {:?}", other)),
        }
    }
}
