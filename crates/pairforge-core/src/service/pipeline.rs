//! Draft submission and promotion pipeline.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use pairforge_types::conversation::ConversationId;
use pairforge_types::draft::{Draft, DraftId, DraftStatus, SubmitDraftRequest};
use pairforge_types::error::{DraftError, LedgerError, StoreError};
use pairforge_types::validation::ValidationPolicy;
use pairforge_types::version::NewFileVersion;
use tokio::sync::Mutex;
use tracing::info;

use crate::service::hash::ContentHasher;
use crate::store::draft::DraftStore;
use crate::store::ledger::VersionLedger;
use crate::validator::CompletenessValidator;

/// Drives a draft from submission through review to promotion.
///
/// Every state change is a compare-and-swap in the draft store, so a draft
/// can never be approved or promoted twice even under concurrent review.
/// Promotions for the same (conversation, filename) are additionally
/// serialized through an in-process lock table so ledger writes for one file
/// happen one at a time; different files proceed in parallel.
pub struct DraftPipeline<D, L, H> {
    drafts: D,
    ledger: L,
    hasher: H,
    validator: CompletenessValidator,
    locks: DashMap<(ConversationId, String), Arc<Mutex<()>>>,
}

impl<D, L, H> DraftPipeline<D, L, H>
where
    D: DraftStore,
    L: VersionLedger,
    H: ContentHasher,
{
    pub fn new(drafts: D, ledger: L, hasher: H, policy: ValidationPolicy) -> Self {
        Self {
            drafts,
            ledger,
            hasher,
            validator: CompletenessValidator::new(policy),
            locks: DashMap::new(),
        }
    }

    /// Score submitted content and stage it as a draft.
    ///
    /// Content that clears the auto-promotion threshold is promoted
    /// immediately and comes back PROMOTED; anything else stays PENDING for
    /// review. Blank content is rejected outright without creating a draft.
    pub async fn submit(
        &self,
        conversation_id: &ConversationId,
        request: &SubmitDraftRequest,
    ) -> Result<Draft, DraftError> {
        if request.content.trim().is_empty() {
            return Err(DraftError::EmptyContent);
        }

        let lock = self.file_lock(conversation_id, &request.filename);
        let _guard = lock.lock().await;

        let report = self.validator.score(&request.filename, &request.content);
        let draft = Draft {
            id: DraftId::new(),
            conversation_id: conversation_id.clone(),
            filename: request.filename.clone(),
            content: request.content.clone(),
            content_hash: self.hasher.compute_hash(&request.content),
            content_length: request.content.len() as i64,
            completeness_score: report.score,
            issues: report.issues,
            status: DraftStatus::Pending,
            created_at: Utc::now(),
            reviewed_at: None,
            promoted_at: None,
        };
        let draft = self
            .drafts
            .insert(&draft)
            .await
            .map_err(|e| DraftError::StorageError(e.to_string()))?;

        if draft.completeness_score >= self.validator.policy().auto_promote_threshold {
            return self.promote_locked(draft).await;
        }

        info!(
            draft_id = %draft.id,
            filename = %draft.filename,
            score = draft.completeness_score,
            issues = draft.issues.len(),
            "Draft held for review"
        );
        Ok(draft)
    }

    /// Get a draft by ID.
    pub async fn get_draft(&self, id: &DraftId) -> Result<Draft, DraftError> {
        self.require(id).await
    }

    /// List a conversation's drafts, newest first, optionally filtered by
    /// status.
    pub async fn list_drafts(
        &self,
        conversation_id: &ConversationId,
        status: Option<DraftStatus>,
    ) -> Result<Vec<Draft>, DraftError> {
        self.drafts
            .list(conversation_id, status)
            .await
            .map_err(|e| DraftError::StorageError(e.to_string()))
    }

    /// Approve a pending draft. The draft stays staged until promoted.
    pub async fn approve(&self, id: &DraftId) -> Result<Draft, DraftError> {
        let draft = self
            .apply_transition(id, DraftStatus::Pending, DraftStatus::Approved, "approve")
            .await?;
        info!(draft_id = %draft.id, filename = %draft.filename, "Draft approved");
        Ok(draft)
    }

    /// Reject a pending draft. Rejected drafts are terminal but retained.
    pub async fn reject(&self, id: &DraftId) -> Result<Draft, DraftError> {
        let draft = self
            .apply_transition(id, DraftStatus::Pending, DraftStatus::Rejected, "reject")
            .await?;
        info!(draft_id = %draft.id, filename = %draft.filename, "Draft rejected");
        Ok(draft)
    }

    /// Promote an approved draft's content to the latest file version.
    pub async fn promote_approved(&self, id: &DraftId) -> Result<Draft, DraftError> {
        let draft = self.require(id).await?;

        let lock = self.file_lock(&draft.conversation_id, &draft.filename);
        let _guard = lock.lock().await;

        // Re-read under the lock; a concurrent promotion may have won.
        let draft = self.require(id).await?;
        if draft.status != DraftStatus::Approved {
            return Err(DraftError::InvalidState {
                action: "promote".to_string(),
                status: draft.status.to_string(),
            });
        }
        self.promote_locked(draft).await
    }

    /// Write the draft's content into the ledger and mark it PROMOTED.
    ///
    /// Caller must hold the file lock for the draft's (conversation,
    /// filename).
    async fn promote_locked(&self, draft: Draft) -> Result<Draft, DraftError> {
        let version = NewFileVersion {
            conversation_id: draft.conversation_id.clone(),
            filename: draft.filename.clone(),
            content: draft.content.clone(),
            content_hash: draft.content_hash.clone(),
            source_draft_id: Some(draft.id.clone()),
        };
        let recorded = self.ledger.promote(&version).await.map_err(|e| match e {
            StoreError::Conflict(_) => DraftError::Ledger(LedgerError::Conflict(draft.filename.clone())),
            other => DraftError::Ledger(LedgerError::StorageError(other.to_string())),
        })?;

        let updated = self
            .apply_transition(&draft.id, draft.status, DraftStatus::Promoted, "promote")
            .await?;
        info!(
            draft_id = %updated.id,
            filename = %updated.filename,
            version = recorded.version,
            score = updated.completeness_score,
            "Draft promoted"
        );
        Ok(updated)
    }

    /// Compare-and-swap status transition, then return the updated draft.
    ///
    /// When the swap changes no rows the draft is re-read to tell a missing
    /// draft apart from one that is in the wrong state.
    async fn apply_transition(
        &self,
        id: &DraftId,
        from: DraftStatus,
        to: DraftStatus,
        action: &str,
    ) -> Result<Draft, DraftError> {
        let changed = self
            .drafts
            .transition(id, from, to, Utc::now())
            .await
            .map_err(|e| DraftError::StorageError(e.to_string()))?;
        if changed == 0 {
            let current = self
                .drafts
                .get(id)
                .await
                .map_err(|e| DraftError::StorageError(e.to_string()))?;
            return match current {
                None => Err(DraftError::NotFound),
                Some(draft) => Err(DraftError::InvalidState {
                    action: action.to_string(),
                    status: draft.status.to_string(),
                }),
            };
        }
        self.require(id).await
    }

    async fn require(&self, id: &DraftId) -> Result<Draft, DraftError> {
        self.drafts
            .get(id)
            .await
            .map_err(|e| DraftError::StorageError(e.to_string()))?
            .ok_or(DraftError::NotFound)
    }

    /// Per-file promotion lock. The Arc is cloned out of the map so no map
    /// guard is held while waiting on the lock.
    fn file_lock(&self, conversation_id: &ConversationId, filename: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry((conversation_id.clone(), filename.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use chrono::{DateTime, Utc};
    use futures_util::future::join_all;
    use pairforge_types::version::{FileStatus, FileVersion, FileVersionId};

    use super::*;

    #[derive(Clone)]
    struct MemoryDraftStore {
        drafts: Arc<StdMutex<Vec<Draft>>>,
    }

    impl MemoryDraftStore {
        fn new() -> Self {
            Self {
                drafts: Arc::new(StdMutex::new(Vec::new())),
            }
        }

        fn count(&self) -> usize {
            self.drafts.lock().unwrap().len()
        }
    }

    impl DraftStore for MemoryDraftStore {
        async fn insert(&self, draft: &Draft) -> Result<Draft, StoreError> {
            self.drafts.lock().unwrap().push(draft.clone());
            Ok(draft.clone())
        }

        async fn get(&self, id: &DraftId) -> Result<Option<Draft>, StoreError> {
            Ok(self
                .drafts
                .lock()
                .unwrap()
                .iter()
                .find(|d| d.id == *id)
                .cloned())
        }

        async fn list(
            &self,
            conversation_id: &ConversationId,
            status: Option<DraftStatus>,
        ) -> Result<Vec<Draft>, StoreError> {
            let mut drafts: Vec<Draft> = self
                .drafts
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.conversation_id == *conversation_id)
                .filter(|d| status.map_or(true, |s| d.status == s))
                .cloned()
                .collect();
            drafts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(drafts)
        }

        async fn transition(
            &self,
            id: &DraftId,
            from: DraftStatus,
            to: DraftStatus,
            at: DateTime<Utc>,
        ) -> Result<u64, StoreError> {
            let mut drafts = self.drafts.lock().unwrap();
            match drafts.iter_mut().find(|d| d.id == *id && d.status == from) {
                Some(draft) => {
                    draft.status = to;
                    match to {
                        DraftStatus::Approved | DraftStatus::Rejected => {
                            draft.reviewed_at = Some(at)
                        }
                        DraftStatus::Promoted => draft.promoted_at = Some(at),
                        DraftStatus::Pending => {}
                    }
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    #[derive(Clone)]
    struct MemoryLedger {
        files: Arc<StdMutex<Vec<FileVersion>>>,
    }

    impl MemoryLedger {
        fn new() -> Self {
            Self {
                files: Arc::new(StdMutex::new(Vec::new())),
            }
        }

        fn all(&self) -> Vec<FileVersion> {
            self.files.lock().unwrap().clone()
        }
    }

    impl VersionLedger for MemoryLedger {
        async fn record_initial(
            &self,
            file: &NewFileVersion,
            _overwrite: bool,
        ) -> Result<FileVersion, StoreError> {
            let version = FileVersion {
                id: FileVersionId::new(),
                conversation_id: file.conversation_id.clone(),
                filename: file.filename.clone(),
                content: file.content.clone(),
                content_hash: file.content_hash.clone(),
                size_bytes: file.content.len() as i64,
                version: 1,
                status: FileStatus::Original,
                source_draft_id: None,
                created_at: Utc::now(),
            };
            self.files.lock().unwrap().push(version.clone());
            Ok(version)
        }

        async fn promote(&self, file: &NewFileVersion) -> Result<FileVersion, StoreError> {
            let mut files = self.files.lock().unwrap();
            let same_file = |v: &FileVersion| {
                v.conversation_id == file.conversation_id && v.filename == file.filename
            };
            let next = files
                .iter()
                .filter(|v| same_file(v))
                .map(|v| v.version)
                .max()
                .unwrap_or(0)
                + 1;
            for existing in files.iter_mut().filter(|v| same_file(v)) {
                existing.status = FileStatus::Modified;
            }
            let version = FileVersion {
                id: FileVersionId::new(),
                conversation_id: file.conversation_id.clone(),
                filename: file.filename.clone(),
                content: file.content.clone(),
                content_hash: file.content_hash.clone(),
                size_bytes: file.content.len() as i64,
                version: next,
                status: FileStatus::Latest,
                source_draft_id: file.source_draft_id.clone(),
                created_at: Utc::now(),
            };
            files.push(version.clone());
            Ok(version)
        }

        async fn latest_snapshot(
            &self,
            conversation_id: &ConversationId,
        ) -> Result<Vec<FileVersion>, StoreError> {
            let mut latest: Vec<FileVersion> = self
                .files
                .lock()
                .unwrap()
                .iter()
                .filter(|v| v.conversation_id == *conversation_id)
                .filter(|v| v.status == FileStatus::Latest)
                .cloned()
                .collect();
            latest.sort_by(|a, b| a.filename.cmp(&b.filename));
            Ok(latest)
        }

        async fn history(
            &self,
            conversation_id: &ConversationId,
            filename: &str,
        ) -> Result<Vec<FileVersion>, StoreError> {
            let mut versions: Vec<FileVersion> = self
                .files
                .lock()
                .unwrap()
                .iter()
                .filter(|v| v.conversation_id == *conversation_id && v.filename == filename)
                .cloned()
                .collect();
            versions.sort_by_key(|v| v.version);
            Ok(versions)
        }
    }

    struct PlainHasher;

    impl ContentHasher for PlainHasher {
        fn compute_hash(&self, content: &str) -> String {
            format!("hash:{}", content.len())
        }
    }

    const CLEAN_PYTHON: &str = r#"import sys


def greet(name):
    return f"Hello, {name}!"


def main():
    print(greet(sys.argv[1]))


if __name__ == "__main__":
    main()
"#;

    fn pipeline(
        store: MemoryDraftStore,
        ledger: MemoryLedger,
    ) -> DraftPipeline<MemoryDraftStore, MemoryLedger, PlainHasher> {
        DraftPipeline::new(store, ledger, PlainHasher, ValidationPolicy::default())
    }

    fn submit_request(filename: &str, content: &str) -> SubmitDraftRequest {
        SubmitDraftRequest {
            filename: filename.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_blank_content_rejected() {
        let store = MemoryDraftStore::new();
        let pipeline = pipeline(store.clone(), MemoryLedger::new());

        let err = pipeline
            .submit(&ConversationId::new(), &submit_request("main.py", "   \n\t  "))
            .await
            .unwrap_err();

        assert!(matches!(err, DraftError::EmptyContent));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_submit_clean_content_auto_promotes() {
        let store = MemoryDraftStore::new();
        let ledger = MemoryLedger::new();
        let pipeline = pipeline(store.clone(), ledger.clone());
        let conversation = ConversationId::new();

        let draft = pipeline
            .submit(&conversation, &submit_request("main.py", CLEAN_PYTHON))
            .await
            .unwrap();

        assert_eq!(draft.status, DraftStatus::Promoted);
        assert!((draft.completeness_score - 1.0).abs() < f64::EPSILON);
        assert!(draft.issues.is_empty());
        assert!(draft.promoted_at.is_some());
        assert!(draft.reviewed_at.is_none());

        let versions = ledger.all();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version, 1);
        assert_eq!(versions[0].status, FileStatus::Latest);
        assert_eq!(versions[0].source_draft_id, Some(draft.id));
    }

    #[tokio::test]
    async fn test_submit_incomplete_content_held_for_review() {
        let store = MemoryDraftStore::new();
        let ledger = MemoryLedger::new();
        let pipeline = pipeline(store.clone(), ledger.clone());

        let draft = pipeline
            .submit(
                &ConversationId::new(),
                &submit_request("auth.py", "TODO: implement\ndef foo(): pass"),
            )
            .await
            .unwrap();

        assert_eq!(draft.status, DraftStatus::Pending);
        assert!((draft.completeness_score - 0.65).abs() < f64::EPSILON);
        assert_eq!(draft.issues.len(), 2);
        assert!(draft.promoted_at.is_none());
        assert!(ledger.all().is_empty());
    }

    #[tokio::test]
    async fn test_submit_at_exact_threshold_promotes() {
        let content = "import sys\n\ndef greet(name):\n    print('hello ' + name)\n\n# stray \" quote\n";
        let policy = ValidationPolicy {
            balance_penalty: 0.05,
            ..ValidationPolicy::default()
        };
        let ledger = MemoryLedger::new();
        let pipeline = DraftPipeline::new(
            MemoryDraftStore::new(),
            ledger.clone(),
            PlainHasher,
            policy,
        );

        let draft = pipeline
            .submit(&ConversationId::new(), &submit_request("main.py", content))
            .await
            .unwrap();

        // 1.0 - 0.05 = 0.95, exactly the threshold, and >= promotes.
        assert!((draft.completeness_score - 0.95).abs() < f64::EPSILON);
        assert_eq!(draft.status, DraftStatus::Promoted);
        assert_eq!(ledger.all().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_just_below_threshold_held() {
        let content = "import sys\n\ndef greet(name):\n    print('hello ' + name)\n\n# stray \" quote\n";
        let ledger = MemoryLedger::new();
        let pipeline = pipeline(MemoryDraftStore::new(), ledger.clone());

        let draft = pipeline
            .submit(&ConversationId::new(), &submit_request("main.py", content))
            .await
            .unwrap();

        assert!((draft.completeness_score - 0.90).abs() < f64::EPSILON);
        assert_eq!(draft.status, DraftStatus::Pending);
        assert!(ledger.all().is_empty());
    }

    #[tokio::test]
    async fn test_approve_then_promote() {
        let ledger = MemoryLedger::new();
        let pipeline = pipeline(MemoryDraftStore::new(), ledger.clone());
        let conversation = ConversationId::new();

        let draft = pipeline
            .submit(
                &conversation,
                &submit_request("auth.py", "TODO: implement\ndef foo(): pass"),
            )
            .await
            .unwrap();

        let approved = pipeline.approve(&draft.id).await.unwrap();
        assert_eq!(approved.status, DraftStatus::Approved);
        assert!(approved.reviewed_at.is_some());
        assert!(approved.promoted_at.is_none());

        let promoted = pipeline.promote_approved(&draft.id).await.unwrap();
        assert_eq!(promoted.status, DraftStatus::Promoted);
        assert!(promoted.promoted_at.is_some());

        let versions = ledger.all();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].version, 1);
        assert_eq!(versions[0].source_draft_id, Some(draft.id));
    }

    #[tokio::test]
    async fn test_reject_pending_draft() {
        let ledger = MemoryLedger::new();
        let pipeline = pipeline(MemoryDraftStore::new(), ledger.clone());

        let draft = pipeline
            .submit(
                &ConversationId::new(),
                &submit_request("auth.py", "TODO: implement\ndef foo(): pass"),
            )
            .await
            .unwrap();

        let rejected = pipeline.reject(&draft.id).await.unwrap();
        assert_eq!(rejected.status, DraftStatus::Rejected);
        assert!(rejected.reviewed_at.is_some());
        assert!(ledger.all().is_empty());
    }

    #[tokio::test]
    async fn test_approve_twice_fails_with_state() {
        let pipeline = pipeline(MemoryDraftStore::new(), MemoryLedger::new());

        let draft = pipeline
            .submit(
                &ConversationId::new(),
                &submit_request("auth.py", "TODO: implement\ndef foo(): pass"),
            )
            .await
            .unwrap();

        pipeline.approve(&draft.id).await.unwrap();
        let err = pipeline.approve(&draft.id).await.unwrap_err();

        match err {
            DraftError::InvalidState { action, status } => {
                assert_eq!(action, "approve");
                assert_eq!(status, "approved");
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reject_promoted_draft_fails() {
        let pipeline = pipeline(MemoryDraftStore::new(), MemoryLedger::new());

        let draft = pipeline
            .submit(&ConversationId::new(), &submit_request("main.py", CLEAN_PYTHON))
            .await
            .unwrap();
        assert_eq!(draft.status, DraftStatus::Promoted);

        let err = pipeline.reject(&draft.id).await.unwrap_err();
        match err {
            DraftError::InvalidState { action, status } => {
                assert_eq!(action, "reject");
                assert_eq!(status, "promoted");
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_promote_pending_draft_fails() {
        let ledger = MemoryLedger::new();
        let pipeline = pipeline(MemoryDraftStore::new(), ledger.clone());

        let draft = pipeline
            .submit(
                &ConversationId::new(),
                &submit_request("auth.py", "TODO: implement\ndef foo(): pass"),
            )
            .await
            .unwrap();

        let err = pipeline.promote_approved(&draft.id).await.unwrap_err();
        match err {
            DraftError::InvalidState { action, status } => {
                assert_eq!(action, "promote");
                assert_eq!(status, "pending");
            }
            other => panic!("expected InvalidState, got {other:?}"),
        }
        assert!(ledger.all().is_empty());
    }

    #[tokio::test]
    async fn test_missing_draft_not_found() {
        let pipeline = pipeline(MemoryDraftStore::new(), MemoryLedger::new());

        let err = pipeline.approve(&DraftId::new()).await.unwrap_err();
        assert!(matches!(err, DraftError::NotFound));

        let err = pipeline.promote_approved(&DraftId::new()).await.unwrap_err();
        assert!(matches!(err, DraftError::NotFound));
    }

    #[tokio::test]
    async fn test_repeated_promotion_builds_history() {
        let ledger = MemoryLedger::new();
        let pipeline = pipeline(MemoryDraftStore::new(), ledger.clone());
        let conversation = ConversationId::new();

        let first = pipeline
            .submit(&conversation, &submit_request("main.py", CLEAN_PYTHON))
            .await
            .unwrap();
        let revised = format!("{CLEAN_PYTHON}\n\ndef farewell(name):\n    return f\"Bye, {{name}}\"\n");
        let second = pipeline
            .submit(&conversation, &submit_request("main.py", &revised))
            .await
            .unwrap();

        let history = ledger.history(&conversation, "main.py").await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].version, 1);
        assert_eq!(history[0].status, FileStatus::Modified);
        assert_eq!(history[0].source_draft_id, Some(first.id));
        assert_eq!(history[1].version, 2);
        assert_eq!(history[1].status, FileStatus::Latest);
        assert_eq!(history[1].source_draft_id, Some(second.id));
    }

    #[tokio::test]
    async fn test_concurrent_submissions_serialize_per_file() {
        let ledger = MemoryLedger::new();
        let pipeline = Arc::new(pipeline(MemoryDraftStore::new(), ledger.clone()));
        let conversation = ConversationId::new();

        let tasks: Vec<_> = (0..5)
            .map(|i| {
                let pipeline = pipeline.clone();
                let conversation = conversation.clone();
                let content = format!("{CLEAN_PYTHON}\n# revision {i}\n");
                tokio::spawn(async move {
                    pipeline
                        .submit(&conversation, &submit_request("main.py", &content))
                        .await
                })
            })
            .collect();

        for result in join_all(tasks).await {
            let draft = result.unwrap().unwrap();
            assert_eq!(draft.status, DraftStatus::Promoted);
        }

        let versions = ledger.all();
        let mut numbers: Vec<i32> = versions
            .iter()
            .filter(|v| v.filename == "main.py")
            .map(|v| v.version)
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

        let latest: Vec<&FileVersion> = versions
            .iter()
            .filter(|v| v.status == FileStatus::Latest)
            .collect();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].version, 5);
    }
}
