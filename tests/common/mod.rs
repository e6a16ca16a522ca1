//! Shared test fixtures: a seeded random collaboration graph
#![allow(dead_code)]

use grafton::graph::{EdgeSpec, GraphStore, NodeId, NodeSpec};
use rand::prelude::*;
use rand::rngs::StdRng;

const PEOPLE: &[&str] = &[
    "Brad", "Bridget", "Billy", "Betty", "Bob", "Brenda", "Charles", "Cindy", "Chuck",
    "Catherine", "Donald", "Delia", "Evan", "Evelynne", "Frank", "Felicity", "Zeb", "Zoe",
];

const ADJECTIVES: &[&str] = &[
    "flaming", "sparkling", "ambiguous", "random", "open", "free", "massive", "tiny",
    "enterprise", "flailing", "secret",
];

const NOUNS: &[&str] = &[
    "aardvark", "workhorse", "sealion", "butterfly", "grasshopper", "jackrabbit",
    "turtledove", "armyant",
];

/// Install the log subscriber for test runs; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub struct SampleGraph {
    pub users: Vec<NodeId>,
    pub usernames: Vec<String>,
    pub projects: Vec<NodeId>,
    pub project_names: Vec<String>,
}

/// Build a random collaboration graph: every project gets exactly one
/// OWNED_BY owner and at least three CONTRIBUTES_TO contributors.
pub fn generate(store: &mut GraphStore, seed: u64, n_users: usize, n_projects: usize) -> SampleGraph {
    init_tracing();
    assert!(n_users >= 4, "need enough users for three contributors plus an owner");
    let mut rng = StdRng::seed_from_u64(seed);

    let mut pairs: Vec<(String, String)> = Vec::new();
    while pairs.len() < n_users {
        let first = PEOPLE.choose(&mut rng).unwrap();
        let last = PEOPLE.choose(&mut rng).unwrap();
        let username = format!("{}{}", first, last).to_lowercase();
        if !pairs.iter().any(|(_, u)| *u == username) {
            pairs.push((format!("{} {}", first, last), username));
        }
    }

    let users = store
        .create_nodes(
            pairs
                .iter()
                .map(|(name, username)| {
                    NodeSpec::new()
                        .label("user")
                        .property("name", name.as_str())
                        .property("username", username.as_str())
                })
                .collect(),
        )
        .unwrap();

    let mut project_names: Vec<String> = Vec::new();
    while project_names.len() < n_projects {
        let name = format!(
            "{}-{}",
            ADJECTIVES.choose(&mut rng).unwrap(),
            NOUNS.choose(&mut rng).unwrap()
        );
        if !project_names.contains(&name) {
            project_names.push(name);
        }
    }

    let projects = store
        .create_nodes(
            project_names
                .iter()
                .map(|name| NodeSpec::new().label("project").property("name", name.as_str()))
                .collect(),
        )
        .unwrap();

    let mut rels = Vec::new();
    for &project in &projects {
        let owner = *users.choose(&mut rng).unwrap();
        rels.push(EdgeSpec::new(project, "OWNED_BY", owner));

        let max = users.len().min(8);
        let count = rng.gen_range(3..=max);
        for &user in users.choose_multiple(&mut rng, count) {
            rels.push(EdgeSpec::new(user, "CONTRIBUTES_TO", project));
        }
    }
    store.create_edges(rels).unwrap();

    SampleGraph {
        users,
        usernames: pairs.into_iter().map(|(_, u)| u).collect(),
        projects,
        project_names,
    }
}
