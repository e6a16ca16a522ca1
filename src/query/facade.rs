//! Named query operations over the collaboration graph
//!
//! Each operation is a fixed composition of pattern-matcher invocations
//! (plus the path finder for the connection query, plus the aggregator for
//! counted/ordered/limited queries), parameterized by plain scalar
//! arguments. Operations return data only; formatting belongs to the
//! caller.

use super::aggregate::{Aggregator, SortOrder};
use super::matcher::{distinct, exclude_equal, Matcher};
use super::pattern::{Direction, NodeConstraint, Pattern, RelStep};
use crate::algo::{shortest_path, Path};
use crate::graph::{GraphStore, Node, NodeId};
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

/// Label for user nodes
pub const LABEL_USER: &str = "user";
/// Label for project nodes
pub const LABEL_PROJECT: &str = "project";
/// Relationship from a project to its owning user
pub const TYPE_OWNED_BY: &str = "OWNED_BY";
/// Relationship from a contributing user to a project
pub const TYPE_CONTRIBUTES_TO: &str = "CONTRIBUTES_TO";
/// Property key identifying a user
pub const PROP_USERNAME: &str = "username";
/// Display-name property on users and projects
pub const PROP_NAME: &str = "name";

/// Errors surfaced by operations anchored on a named entity
#[derive(Error, Debug, PartialEq)]
pub enum QueryError {
    #[error("no user with username {0:?}")]
    UserNotFound(String),

    #[error("no project named {0:?}")]
    ProjectNotFound(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// A project together with its owner and name-ordered contributors
#[derive(Debug, Clone)]
pub struct ProjectContributors {
    pub project: Node,
    pub owner: Option<Node>,
    pub contributors: Vec<Node>,
}

/// The query façade: named operations over a store snapshot
pub struct Queries<'a> {
    store: &'a GraphStore,
    matcher: Matcher<'a>,
    aggregator: Aggregator<'a>,
}

impl<'a> Queries<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self {
            store,
            matcher: Matcher::new(store),
            aggregator: Aggregator::new(store),
        }
    }

    /// Register the point-lookup indexes the named operations lean on
    pub fn register_default_indexes(store: &mut GraphStore) {
        store.register_index(LABEL_USER, PROP_USERNAME);
        store.register_index(LABEL_PROJECT, PROP_NAME);
    }

    /// Get a user node by username; first match in insertion order
    pub fn user_by_username(&self, username: &str) -> Option<Node> {
        let pattern = Pattern::node(
            NodeConstraint::var("n")
                .label(LABEL_USER)
                .prop(PROP_USERNAME, username),
        );
        self.first_node(&pattern, "n")
    }

    /// Get a project node by name; first match in insertion order
    pub fn project_by_name(&self, name: &str) -> Option<Node> {
        let pattern = Pattern::node(
            NodeConstraint::var("n")
                .label(LABEL_PROJECT)
                .prop(PROP_NAME, name),
        );
        self.first_node(&pattern, "n")
    }

    /// Projects owned by the named user, in creation order
    pub fn projects_owned_by(&self, username: &str) -> QueryResult<Vec<Node>> {
        let owner = self.require_user(username)?;

        // (p:project)-[:OWNED_BY]->(owner)
        let pattern = Pattern::node(NodeConstraint::var("p").label(LABEL_PROJECT)).step(
            RelStep::outgoing(TYPE_OWNED_BY),
            NodeConstraint::var("u").anchor(owner.id),
        );
        Ok(self.collect_nodes(self.matcher.matches(&pattern), "p"))
    }

    /// (owner, project) pairs across all projects, optionally limited
    pub fn project_owners(&self, limit: Option<usize>) -> Vec<(Node, Node)> {
        // (p:project)-[:OWNED_BY]->(u:user)
        let pattern = Pattern::node(NodeConstraint::var("p").label(LABEL_PROJECT)).step(
            RelStep::outgoing(TYPE_OWNED_BY),
            NodeConstraint::var("u").label(LABEL_USER),
        );
        let mut sets = self.matcher.matches(&pattern);
        Aggregator::limit(&mut sets, limit);

        sets.iter()
            .filter_map(|s| {
                let owner = self.node(s.node("u")?)?;
                let project = self.node(s.node("p")?)?;
                Some((owner, project))
            })
            .collect()
    }

    /// The named project's owner and its contributors ordered by name
    pub fn project_contributors(&self, name: &str) -> QueryResult<ProjectContributors> {
        let project = self.require_project(name)?;

        // (p anchored)-[:OWNED_BY]->(u:user)
        let owner_pattern = Pattern::node(NodeConstraint::var("p").anchor(project.id)).step(
            RelStep::outgoing(TYPE_OWNED_BY),
            NodeConstraint::var("u").label(LABEL_USER),
        );
        let owner = self.first_node(&owner_pattern, "u");

        // (u:user)-[:CONTRIBUTES_TO]->(p anchored), ORDER BY u.name
        let contrib_pattern = Pattern::node(NodeConstraint::var("u").label(LABEL_USER)).step(
            RelStep::outgoing(TYPE_CONTRIBUTES_TO),
            NodeConstraint::var("p").anchor(project.id),
        );
        let mut sets = self.matcher.matches(&contrib_pattern);
        self.aggregator
            .sort_by_property(&mut sets, "u", PROP_NAME, SortOrder::Ascending);

        Ok(ProjectContributors {
            project,
            owner,
            contributors: self.collect_nodes(sets, "u"),
        })
    }

    /// Distinct (contributor, project) pairs across all projects the named
    /// user owns, excluding the owner, ordered by contributor then project name
    pub fn transitive_contributors(&self, username: &str) -> QueryResult<Vec<(Node, Node)>> {
        let owner = self.require_user(username)?;

        // (p:project)-[:OWNED_BY]->(owner) joined with
        // (u:user)-[:CONTRIBUTES_TO]->(p) on p, DISTINCT, NOT u = owner
        let owned = Pattern::node(NodeConstraint::var("p").label(LABEL_PROJECT)).step(
            RelStep::outgoing(TYPE_OWNED_BY),
            NodeConstraint::var("owner").anchor(owner.id),
        );
        let contrib = Pattern::node(NodeConstraint::var("u").label(LABEL_USER)).step(
            RelStep::outgoing(TYPE_CONTRIBUTES_TO),
            NodeConstraint::var("p").label(LABEL_PROJECT),
        );

        let joined = self.matcher.join(
            &self.matcher.matches(&owned),
            &self.matcher.matches(&contrib),
            "p",
        );
        let mut sets = distinct(exclude_equal(joined, "u", "owner"));

        // Order by project name within contributor name: secondary key
        // first, then a stable pass on the primary.
        self.aggregator
            .sort_by_property(&mut sets, "p", PROP_NAME, SortOrder::Ascending);
        self.aggregator
            .sort_by_property(&mut sets, "u", PROP_NAME, SortOrder::Ascending);

        Ok(sets
            .iter()
            .filter_map(|s| Some((self.node(s.node("u")?)?, self.node(s.node("p")?)?)))
            .collect())
    }

    /// Shortest connection between two users; `Ok(None)` when disconnected
    pub fn connection_between(
        &self,
        username_a: &str,
        username_b: &str,
        direction: Direction,
    ) -> QueryResult<Option<Path>> {
        let a = self.require_user(username_a)?;
        let b = self.require_user(username_b)?;
        Ok(shortest_path(self.store, a.id, b.id, direction))
    }

    /// Projects the named user does not contribute to, reached through a
    /// shared contributor, counted by distinct shared contributors
    ///
    /// Ordered by descending count, then ascending project name; truncated
    /// to `limit`.
    pub fn recommended_projects(
        &self,
        username: &str,
        limit: Option<usize>,
    ) -> QueryResult<Vec<(Node, usize)>> {
        let me = self.require_user(username)?;
        let mine = self.contributed_projects(me.id);

        // (me)-[:CONTRIBUTES_TO]->(p)<-[:CONTRIBUTES_TO]-(peer)-[:CONTRIBUTES_TO]->(q)
        let chain = Pattern::node(NodeConstraint::var("me").anchor(me.id))
            .step(
                RelStep::outgoing(TYPE_CONTRIBUTES_TO),
                NodeConstraint::var("p").label(LABEL_PROJECT),
            )
            .step(
                RelStep::incoming(TYPE_CONTRIBUTES_TO),
                NodeConstraint::var("peer").label(LABEL_USER),
            )
            .step(
                RelStep::outgoing(TYPE_CONTRIBUTES_TO),
                NodeConstraint::var("q").label(LABEL_PROJECT),
            );

        let sets: Vec<_> = exclude_equal(self.matcher.matches(&chain), "peer", "me")
            .into_iter()
            .filter(|s| s.node("q").is_some_and(|q| !mine.contains(&q)))
            .collect();

        let mut rows = self.aggregator.group_count(&sets, "q", "peer");
        self.aggregator.sort_counted_desc(&mut rows, PROP_NAME);
        Aggregator::limit(&mut rows, limit);
        debug!(username, candidates = rows.len(), "computed project recommendations");

        Ok(self.counted_nodes(rows))
    }

    /// Other users sharing at least one project with the named user, counted
    /// by distinct shared projects
    ///
    /// Ordered by descending count, then ascending user name; truncated to
    /// `limit`.
    pub fn similar_contributors(
        &self,
        username: &str,
        limit: Option<usize>,
    ) -> QueryResult<Vec<(Node, usize)>> {
        let me = self.require_user(username)?;

        // (me)-[:CONTRIBUTES_TO]->(p)<-[:CONTRIBUTES_TO]-(peer)
        let chain = Pattern::node(NodeConstraint::var("me").anchor(me.id))
            .step(
                RelStep::outgoing(TYPE_CONTRIBUTES_TO),
                NodeConstraint::var("p").label(LABEL_PROJECT),
            )
            .step(
                RelStep::incoming(TYPE_CONTRIBUTES_TO),
                NodeConstraint::var("peer").label(LABEL_USER),
            );

        let sets = exclude_equal(self.matcher.matches(&chain), "peer", "me");

        let mut rows = self.aggregator.group_count(&sets, "peer", "p");
        self.aggregator.sort_counted_desc(&mut rows, PROP_NAME);
        Aggregator::limit(&mut rows, limit);

        Ok(self.counted_nodes(rows))
    }

    // ============================================================
    // Helpers
    // ============================================================

    fn require_user(&self, username: &str) -> QueryResult<Node> {
        self.user_by_username(username)
            .ok_or_else(|| QueryError::UserNotFound(username.to_string()))
    }

    fn require_project(&self, name: &str) -> QueryResult<Node> {
        self.project_by_name(name)
            .ok_or_else(|| QueryError::ProjectNotFound(name.to_string()))
    }

    fn contributed_projects(&self, user: NodeId) -> FxHashSet<NodeId> {
        let pattern = Pattern::node(NodeConstraint::var("me").anchor(user)).step(
            RelStep::outgoing(TYPE_CONTRIBUTES_TO),
            NodeConstraint::var("p").label(LABEL_PROJECT),
        );
        self.matcher
            .matches(&pattern)
            .iter()
            .filter_map(|s| s.node("p"))
            .collect()
    }

    fn first_node(&self, pattern: &Pattern, var: &str) -> Option<Node> {
        self.matcher
            .matches(pattern)
            .into_iter()
            .next()
            .and_then(|s| s.node(var))
            .and_then(|id| self.node(id))
    }

    fn node(&self, id: NodeId) -> Option<Node> {
        self.store.node(id).cloned()
    }

    fn collect_nodes(&self, sets: Vec<super::binding::BindingSet>, var: &str) -> Vec<Node> {
        sets.iter()
            .filter_map(|s| s.node(var))
            .filter_map(|id| self.node(id))
            .collect()
    }

    fn counted_nodes(&self, rows: Vec<(NodeId, usize)>) -> Vec<(Node, usize)> {
        rows.into_iter()
            .filter_map(|(id, count)| Some((self.node(id)?, count)))
            .collect()
    }
}
