//! Dataset-level insights: publication trends, topic frequency, research
//! gaps, and the organism / environment facets used by the dashboard filter.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use biospace_common::{Publication, DEFAULT_TOPIC};
use serde::{Deserialize, Serialize};

use crate::classification::{classify, NodeKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCount {
    pub name: String,
    pub count: usize,
}

/// A topic / organism / environment combination and how many publications
/// cover it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchGap {
    pub topic: String,
    pub organism: Option<String>,
    pub environment: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub publications_by_year: Vec<YearCount>,
    pub top_topics: Vec<TopicCount>,
}

/// Publication counts per year, ascending by year.
pub fn publications_by_year(publications: &[Publication]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for p in publications {
        *counts.entry(p.publication_year).or_default() += 1;
    }
    counts.into_iter().map(|(year, count)| YearCount { year, count }).collect()
}

/// The `n` most frequent topic labels, descending by count, ties by name.
pub fn top_topics(publications: &[Publication], n: usize) -> Vec<TopicCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for topic in publications.iter().flat_map(|p| p.topics.iter()) {
        *counts.entry(topic.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<TopicCount> = counts
        .into_iter()
        .map(|(name, count)| TopicCount { name: name.to_string(), count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(n);
    ranked
}

/// Names of the `n` most frequent topics; the consensus picker offers these.
pub fn major_topics(publications: &[Publication], n: usize) -> Vec<String> {
    top_topics(publications, n).into_iter().map(|t| t.name).collect()
}

pub fn trends(publications: &[Publication], top_n: usize) -> Trends {
    Trends {
        publications_by_year: publications_by_year(publications),
        top_topics: top_topics(publications, top_n),
    }
}

/// Under-studied combinations: every (generic topic, organism?, environment?)
/// triple seen in the data, ascending by publication count, then by topic.
/// The placeholder topic is not a research area and is skipped.
pub fn research_gaps(publications: &[Publication], max: usize) -> Vec<ResearchGap> {
    type Key = (String, Option<String>, Option<String>);
    let mut counts: BTreeMap<Key, usize> = BTreeMap::new();

    for p in publications {
        let mut topics = Vec::new();
        let mut organisms = Vec::new();
        let mut environments = Vec::new();
        for t in &p.topics {
            match classify(t) {
                NodeKind::Organism => organisms.push(Some(t.clone())),
                NodeKind::Environment => environments.push(Some(t.clone())),
                _ if t == DEFAULT_TOPIC => {}
                _ => topics.push(t.clone()),
            }
        }
        if organisms.is_empty() {
            organisms.push(None);
        }
        if environments.is_empty() {
            environments.push(None);
        }

        for topic in &topics {
            for organism in &organisms {
                for environment in &environments {
                    *counts
                        .entry((topic.clone(), organism.clone(), environment.clone()))
                        .or_default() += 1;
                }
            }
        }
    }

    let mut gaps: Vec<ResearchGap> = counts
        .into_iter()
        .map(|((topic, organism, environment), count)| ResearchGap {
            topic,
            organism,
            environment,
            count,
        })
        .collect();
    // Stable sort keeps the BTreeMap order for equal counts.
    gaps.sort_by_key(|g| g.count);
    gaps.truncate(max);
    gaps
}

/// Distinct values available to the dashboard filter, each sorted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Facets {
    pub topics: Vec<String>,
    pub organisms: Vec<String>,
    pub environments: Vec<String>,
}

pub fn facets(publications: &[Publication]) -> Facets {
    let mut topics = BTreeSet::new();
    let mut organisms = BTreeSet::new();
    let mut environments = BTreeSet::new();
    for t in publications.iter().flat_map(|p| p.topics.iter()) {
        match classify(t) {
            NodeKind::Organism => organisms.insert(t.clone()),
            NodeKind::Environment => environments.insert(t.clone()),
            _ => topics.insert(t.clone()),
        };
    }
    Facets {
        topics: topics.into_iter().collect(),
        organisms: organisms.into_iter().collect(),
        environments: environments.into_iter().collect(),
    }
}

/// Dashboard selection. Each non-empty group requires the publication to
/// carry at least one of its values; empty groups do not filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacetFilter {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub organisms: Vec<String>,
    #[serde(default)]
    pub environments: Vec<String>,
}

impl FacetFilter {
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty() && self.organisms.is_empty() && self.environments.is_empty()
    }

    pub fn matches(&self, publication: &Publication) -> bool {
        let group = |selected: &[String]| {
            selected.is_empty() || selected.iter().any(|s| publication.has_topic(s))
        };
        group(&self.topics) && group(&self.organisms) && group(&self.environments)
    }

    pub fn apply<'a>(&self, publications: impl IntoIterator<Item = &'a Publication>) -> Vec<&'a Publication> {
        publications.into_iter().filter(|p| self.matches(p)).collect()
    }
}
