//! The ordered page collection and its navigation links.
//!
//! Links are derived from date arithmetic alone. A link whose target date has
//! no page is dropped and reported as a [`Warning::DanglingLink`]; only a
//! structurally broken graph is an error.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, NaiveDate};
use indexmap::IndexMap;
use log::{debug, warn};
use petgraph::{
    Direction,
    algo::is_cyclic_directed,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use thiserror::Error;

use super::node::{LinkKind, PageId, PageKind, PageLink, PageNode, PageStateError};
use crate::error::Warning;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate page `{0}`")]
    DuplicatePage(String),

    #[error("link from `{from}` targets missing page `{target}`")]
    MissingTarget { from: String, target: String },

    #[error("next-day links form a cycle")]
    ForwardCycle,

    #[error("daily page `{page}` has {count} back-to-week links resolving to a weekly page")]
    BackLink { page: String, count: usize },

    #[error(transparent)]
    State(#[from] PageStateError),
}

/// All pages of one document plus the date-to-page map.
#[derive(Debug, Clone)]
pub struct DocumentLinkGraph {
    pages: IndexMap<PageId, PageNode>,
    by_date: BTreeMap<NaiveDate, PageId>,
    weekly: PageId,
}

impl DocumentLinkGraph {
    /// Collects a weekly page and its daily pages. The weekly page comes
    /// first, followed by daily pages in date order.
    pub fn new(weekly: PageNode, mut dailies: Vec<PageNode>) -> Result<Self, GraphError> {
        dailies.sort_by_key(PageNode::start);

        let weekly_id = weekly.id().clone();
        let mut pages = IndexMap::with_capacity(dailies.len() + 1);
        let mut by_date = BTreeMap::new();
        pages.insert(weekly_id.clone(), weekly);

        for page in dailies {
            let id = page.id().clone();
            if pages.contains_key(&id) {
                return Err(GraphError::DuplicatePage(id.to_string()));
            }
            by_date.insert(page.start(), id.clone());
            pages.insert(id, page);
        }

        Ok(Self {
            pages,
            by_date,
            weekly: weekly_id,
        })
    }

    /// Attaches navigation links to every page.
    ///
    /// Daily pages get previous-day, next-day and back-to-week links; the
    /// weekly page gets one link per day cell. Targets outside the collection
    /// are omitted and reported.
    pub fn link(self) -> Result<(Self, Vec<Warning>), GraphError> {
        let Self {
            pages,
            by_date,
            weekly,
        } = self;

        let mut warnings = Vec::new();
        let mut linked = IndexMap::with_capacity(pages.len());

        for (id, page) in pages {
            let wanted: Vec<(LinkKind, Option<NaiveDate>, Option<PageId>)> = match page.kind() {
                PageKind::Daily => {
                    let date = page.start();
                    let previous = date.checked_sub_days(Days::new(1));
                    let next = date.checked_add_days(Days::new(1));
                    let page_of = |day: Option<NaiveDate>| day.and_then(|d| by_date.get(&d).cloned());
                    vec![
                        (LinkKind::PreviousDay, previous, page_of(previous)),
                        (LinkKind::NextDay, next, page_of(next)),
                        (LinkKind::BackToWeek, Some(date), Some(weekly.clone())),
                    ]
                }
                PageKind::Weekly => page
                    .dates()
                    .map(|date| (LinkKind::DayCell, Some(date), by_date.get(&date).cloned()))
                    .collect(),
            };

            let mut links = Vec::with_capacity(wanted.len());
            for (kind, date, target) in wanted {
                match (target, date) {
                    (Some(target), Some(date)) => links.push(PageLink::new(kind, target, date)),
                    (_, date) => {
                        debug!(page = id.as_str(), kind:% = kind, date:? = date; "Omitting dangling link");
                        warnings.push(Warning::DanglingLink {
                            page: id.to_string(),
                            kind,
                            target: date,
                        });
                    }
                }
            }

            linked.insert(id, page.link(links)?);
        }

        let graph = Self {
            pages: linked,
            by_date,
            weekly,
        };
        Ok((graph, warnings))
    }

    /// Checks that every link resolves, next-day links are acyclic, and every
    /// daily page has exactly one back link to a weekly page.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut graph: DiGraph<PageKind, LinkKind> = DiGraph::new();
        let indices: HashMap<&PageId, NodeIndex> = self
            .pages
            .iter()
            .map(|(id, page)| (id, graph.add_node(page.kind())))
            .collect();

        for (id, page) in &self.pages {
            for link in page.links() {
                let Some(&to) = indices.get(link.target()) else {
                    warn!(page = id.as_str(), target = link.target().as_str(); "Unresolved link");
                    return Err(GraphError::MissingTarget {
                        from: id.to_string(),
                        target: link.target().to_string(),
                    });
                };
                graph.add_edge(indices[id], to, link.kind());
            }
        }

        for (id, page) in &self.pages {
            if page.kind() != PageKind::Daily {
                continue;
            }
            let back_links = graph
                .edges_directed(indices[id], Direction::Outgoing)
                .filter(|edge| {
                    *edge.weight() == LinkKind::BackToWeek
                        && graph[edge.target()] == PageKind::Weekly
                })
                .count();
            if back_links != 1 {
                return Err(GraphError::BackLink {
                    page: id.to_string(),
                    count: back_links,
                });
            }
        }

        let forward = graph.filter_map(
            |_, kind| Some(*kind),
            |_, kind| (*kind == LinkKind::NextDay).then_some(()),
        );
        if is_cyclic_directed(&forward) {
            return Err(GraphError::ForwardCycle);
        }

        debug!(pages = graph.node_count(), links = graph.edge_count(); "Link graph validated");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in document order.
    pub fn pages(&self) -> impl Iterator<Item = &PageNode> {
        self.pages.values()
    }

    pub fn page(&self, id: &PageId) -> Option<&PageNode> {
        self.pages.get(id)
    }

    pub fn page_for_date(&self, date: NaiveDate) -> Option<&PageNode> {
        self.by_date.get(&date).and_then(|id| self.pages.get(id))
    }

    pub fn weekly(&self) -> Option<&PageNode> {
        self.pages.get(&self.weekly)
    }

    pub(crate) fn into_pages(self) -> impl Iterator<Item = PageNode> {
        self.pages.into_values()
    }
}
