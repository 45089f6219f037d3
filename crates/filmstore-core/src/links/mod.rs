//! Referential integrity engine
//!
//! The catalog denormalizes its cross-references: actors carry the ids of
//! their films, films carry the ids of their reviews, and both sides of
//! the actor↔film association hold a copy of the link. Nothing in the
//! store derives these at query time, so every mutating operation that
//! touches a link goes through this engine.
//!
//! The store offers no multi-document transactions. Multi-step operations
//! are therefore ordered so the dependent write happens last, and a failed
//! dependent write triggers a compensating action that undoes the first
//! step. Sweeps across many actors are best-effort: a mid-sweep failure is
//! logged as a discrepancy and the sweep continues.

use std::sync::Arc;

use serde_json::Value;

use crate::constants::{ACTORS, FILMS, REVIEWS};
use crate::store::{DocumentStore, Filter, Patch};
use crate::types::{CatalogError, CatalogResult, DocId, Review};
use crate::{log_debug, log_warn};

/// Maintains the denormalized link collections across mutations.
///
/// Holds a shared handle to the injected store; cloning is cheap.
pub struct LinkEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for LinkEngine<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone() }
    }
}

impl<S: DocumentStore> LinkEngine<S> {
    /// Create an engine over the given store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Resolve actor surnames to identities by exact, case-sensitive match.
    ///
    /// Surnames with no matching actor are dropped, not errors; the
    /// catalog has always accepted films naming unknown cast members. The
    /// returned list preserves payload order and contains no duplicates.
    pub fn resolve_surnames(&self, surnames: &[String]) -> CatalogResult<Vec<DocId>> {
        let mut resolved = Vec::with_capacity(surnames.len());
        for surname in surnames {
            let filter = Filter::Eq("surname", Value::String(surname.clone()));
            match self.store.find_one(ACTORS, &filter)? {
                Some(actor) => {
                    let id = doc_id(&actor)?;
                    if !resolved.contains(&id) {
                        resolved.push(id);
                    }
                }
                None => {
                    log_warn!("dropping unmatched actor surname '{}'", surname);
                }
            }
        }
        Ok(resolved)
    }

    /// Append a film to each listed actor's back-reference list.
    ///
    /// Deduplication is by identity: an actor never lists the same film
    /// twice, however many times the link is attached. Per-actor updates
    /// are atomic; the sweep across actors is best-effort and a failure
    /// partway through is logged rather than rolled back.
    pub fn attach_film(&self, film_id: DocId, actor_ids: &[DocId]) -> CatalogResult<()> {
        let film_ref = Value::String(film_id.to_string());
        for actor_id in actor_ids {
            let result = self.store.update_one(
                ACTORS,
                &Filter::Id(*actor_id),
                &Patch::AddToSet("films", film_ref.clone()),
            );
            match result {
                Ok(Some(_)) => {}
                Ok(None) => {
                    log_warn!(
                        "actor {} disappeared while linking film {}",
                        actor_id,
                        film_id
                    );
                }
                Err(err) => {
                    // Non-fatal discrepancy: some actors already carry the
                    // link and stay that way.
                    log_warn!(
                        "failed to link film {} to actor {}: {}",
                        film_id,
                        actor_id,
                        err
                    );
                }
            }
        }
        Ok(())
    }

    /// Reconcile actor back-references after a film's cast changed.
    ///
    /// Actors dropped from the list lose the film id; newly referenced
    /// actors gain it (deduplicated). Unchanged actors are not touched.
    pub fn relink_actors(
        &self,
        film_id: DocId,
        old: &[DocId],
        new: &[DocId],
    ) -> CatalogResult<()> {
        let film_ref = Value::String(film_id.to_string());
        for dropped in old.iter().filter(|id| !new.contains(id)) {
            if let Err(err) = self.store.update_one(
                ACTORS,
                &Filter::Id(*dropped),
                &Patch::Pull("films", film_ref.clone()),
            ) {
                log_warn!(
                    "failed to unlink film {} from actor {}: {}",
                    film_id,
                    dropped,
                    err
                );
            }
        }
        let added: Vec<DocId> = new
            .iter()
            .filter(|id| !old.contains(id))
            .copied()
            .collect();
        self.attach_film(film_id, &added)
    }

    /// Cascade a film deletion: sweep the film id out of every actor's
    /// back-reference list and delete every review of the film. Reviews
    /// cannot outlive their film.
    ///
    /// Returns the number of actors updated and reviews removed.
    pub fn unlink_film(&self, film_id: DocId) -> CatalogResult<(usize, usize)> {
        let film_ref = Value::String(film_id.to_string());

        let referencing = self
            .store
            .find(ACTORS, &Filter::Contains("films", film_ref.clone()))?;
        let mut actors_updated = 0;
        for actor in &referencing {
            let actor_id = doc_id(actor)?;
            match self.store.update_one(
                ACTORS,
                &Filter::Id(actor_id),
                &Patch::Pull("films", film_ref.clone()),
            ) {
                Ok(Some(_)) => actors_updated += 1,
                Ok(None) => {}
                Err(err) => {
                    log_warn!(
                        "cascade for film {} left actor {} inconsistent: {}",
                        film_id,
                        actor_id,
                        err
                    );
                }
            }
        }

        let mut reviews_removed = 0;
        loop {
            let removed = self
                .store
                .delete_one(REVIEWS, &Filter::Eq("film_id", film_ref.clone()))?;
            if removed == 0 {
                break;
            }
            reviews_removed += removed as usize;
        }

        log_debug!(
            "cascade for film {}: {} actors updated, {} reviews removed",
            film_id,
            actors_updated,
            reviews_removed
        );
        Ok((actors_updated, reviews_removed))
    }

    /// Insert a review and append its id to the parent film's list.
    ///
    /// The insert happens first; if the list update then fails (or the
    /// film vanished in between), the review is deleted again so a reader
    /// never finds a review its film does not list.
    pub fn create_review(&self, film_id: DocId, review: &Review) -> CatalogResult<DocId> {
        let review_id = self.store.insert_one(REVIEWS, review.encode())?;

        let linked = self.store.update_one(
            FILMS,
            &Filter::Id(film_id),
            &Patch::AddToSet("reviews", Value::String(review_id.to_string())),
        );
        match linked {
            Ok(Some(_)) => Ok(review_id),
            Ok(None) => {
                self.compensate_review_insert(film_id, review_id);
                Err(CatalogError::NotFound("film"))
            }
            Err(err) => {
                self.compensate_review_insert(film_id, review_id);
                Err(err)
            }
        }
    }

    fn compensate_review_insert(&self, film_id: DocId, review_id: DocId) {
        log_warn!(
            "linking review {} to film {} failed, deleting the review",
            review_id,
            film_id
        );
        if let Err(err) = self.store.delete_one(REVIEWS, &Filter::Id(review_id)) {
            // Both steps failed; the orphan survives until a later cascade.
            log_warn!("compensating delete of review {} failed: {}", review_id, err);
        }
    }

    /// Delete a review and pull its id from the parent film's list.
    ///
    /// The delete happens first; if the pull then fails, the review
    /// document is re-inserted to restore the pair, and the error is
    /// surfaced.
    pub fn delete_review(&self, film_id: DocId, review_id: DocId) -> CatalogResult<()> {
        let review_doc = self
            .store
            .find_one(REVIEWS, &Filter::Id(review_id))?
            .ok_or(CatalogError::NotFound("review"))?;

        let removed = self.store.delete_one(REVIEWS, &Filter::Id(review_id))?;
        if removed == 0 {
            return Err(CatalogError::NotFound("review"));
        }

        let pulled = self.store.update_one(
            FILMS,
            &Filter::Id(film_id),
            &Patch::Pull("reviews", Value::String(review_id.to_string())),
        );
        match pulled {
            Ok(_) => Ok(()),
            Err(err) => {
                log_warn!(
                    "unlinking review {} from film {} failed, restoring the review",
                    review_id,
                    film_id
                );
                if let Err(restore_err) = self.store.insert_one(REVIEWS, review_doc) {
                    log_warn!(
                        "restoring review {} failed: {}",
                        review_id,
                        restore_err
                    );
                }
                Err(err)
            }
        }
    }
}

/// Read the identity a stored document was filed under.
fn doc_id(doc: &crate::types::Document) -> CatalogResult<DocId> {
    doc.get(crate::constants::ID_FIELD)
        .and_then(Value::as_str)
        .ok_or_else(|| CatalogError::Store("stored document has no _id".into()))?
        .parse()
}
