//! Listing filters, sorting, and pagination.
//!
//! Filters combine with AND; the multi-value fields (`type`, `status`,
//! `network`) use OR semantics within the field. These are domain types;
//! the HTTP layer parses the query string into them.

use crate::agent::model::{Agent, AgentStatus, AgentType, Network};
use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 100;
pub const MAX_SEARCH_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    CreatedAt,
    Reputation,
    Earnings,
    Activity,
}

impl FromStr for SortBy {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(Self::CreatedAt),
            "reputation" => Ok(Self::Reputation),
            "earnings" => Ok(Self::Earnings),
            "activity" => Ok(Self::Activity),
            other => Err(RegistryError::validation(format!(
                "unknown sort key: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(RegistryError::validation(format!(
                "unknown sort order: {other}"
            ))),
        }
    }
}

/// Listing query. All fields optional; defaults applied at evaluation.
#[derive(Debug, Clone, Default)]
pub struct AgentFilters {
    pub agent_type: Option<Vec<AgentType>>,
    pub status: Option<Vec<AgentStatus>>,
    pub network: Option<Vec<Network>>,
    pub owner_id: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub min_reputation: Option<f64>,
    pub search: Option<String>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl AgentFilters {
    /// Scope the query to one owner, as the `/my` route does.
    pub fn for_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    /// Whether an agent passes every supplied filter. The unscoped-listing
    /// visibility rule (no `owner_id` filter hides private agents) lives
    /// here too.
    pub fn matches(&self, agent: &Agent) -> bool {
        if let Some(types) = &self.agent_type {
            if !types.contains(&agent.agent_type) {
                return false;
            }
        }

        if let Some(statuses) = &self.status {
            if !statuses.contains(&agent.status) {
                return false;
            }
        }

        if let Some(networks) = &self.network {
            if !networks.contains(&agent.network) {
                return false;
            }
        }

        if let Some(owner_id) = &self.owner_id {
            if &agent.owner_id != owner_id {
                return false;
            }
        }

        if let Some(is_public) = self.is_public {
            if agent.is_public != is_public {
                return false;
            }
        }

        if let Some(tags) = &self.tags {
            if !tags.is_empty() && !tags.iter().any(|t| agent.tags.contains(t)) {
                return false;
            }
        }

        if let Some(min) = self.min_reputation {
            if (agent.reputation.score as f64) < min {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !agent.name.to_lowercase().contains(&needle)
                && !agent.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        // Private agents are invisible in unscoped listings.
        if self.owner_id.is_none() && !agent.is_public {
            return false;
        }

        true
    }

    /// Sort in place per `sort_by`/`sort_order`. No sort key means the
    /// store's scan order is kept. Ties keep their relative order.
    pub fn sort(&self, agents: &mut [Agent]) {
        let Some(sort_by) = self.sort_by else {
            return;
        };
        let descending = self.sort_order == Some(SortOrder::Desc);

        agents.sort_by(|a, b| {
            let ordering = match sort_by {
                SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
                SortBy::Reputation => a.reputation.score.cmp(&b.reputation.score),
                SortBy::Earnings => a
                    .statistics
                    .total_earnings
                    .partial_cmp(&b.statistics.total_earnings)
                    .unwrap_or(std::cmp::Ordering::Equal),
                // Agents that were never active sort as the epoch.
                SortBy::Activity => a
                    .last_active_at
                    .map(|t| t.timestamp_millis())
                    .unwrap_or(0)
                    .cmp(&b.last_active_at.map(|t| t.timestamp_millis()).unwrap_or(0)),
            };
            // Reversing the ordering, not the slice, keeps ties stable.
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// One page of listing results; `total` counts all matches before
/// pagination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPage {
    pub agents: Vec<Agent>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::model::{Configuration, Notifications, Reputation, Statistics};
    use chrono::{TimeZone, Utc};

    fn test_agent(id: &str, owner: &str, public: bool) -> Agent {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Agent {
            id: id.to_string(),
            name: format!("name-{id}"),
            description: format!("description for {id}"),
            agent_type: AgentType::Trading,
            status: AgentStatus::Pending,
            owner_id: owner.to_string(),
            owner_wallet: "wallet".to_string(),
            network: Network::Devnet,
            contract_address: None,
            program_id: None,
            capabilities: Vec::new(),
            configuration: Configuration {
                max_transaction_amount: 1.0,
                daily_transaction_limit: 1.0,
                allowed_tokens: vec!["SOL".to_string()],
                risk_threshold: 0.0,
                operating_hours: None,
                notifications: Notifications::default(),
                custom_parameters: None,
            },
            reputation: Reputation::initial(now),
            statistics: Statistics::initial(now),
            version: "1.0.0".to_string(),
            tags: Vec::new(),
            is_public: public,
            created_at: now,
            updated_at: now,
            deployed_at: None,
            last_active_at: None,
        }
    }

    #[test]
    fn test_unscoped_listing_hides_private_agents() {
        let filters = AgentFilters::default();
        assert!(filters.matches(&test_agent("a", "u1", true)));
        assert!(!filters.matches(&test_agent("b", "u1", false)));
    }

    #[test]
    fn test_owner_scope_reveals_private_agents() {
        let filters = AgentFilters::default().for_owner("u1");
        assert!(filters.matches(&test_agent("a", "u1", false)));
        assert!(!filters.matches(&test_agent("b", "u2", false)));
    }

    #[test]
    fn test_multi_value_fields_use_or_semantics() {
        let mut oracle = test_agent("a", "u1", true);
        oracle.agent_type = AgentType::Oracle;

        let filters = AgentFilters {
            agent_type: Some(vec![AgentType::Trading, AgentType::Oracle]),
            ..Default::default()
        };
        assert!(filters.matches(&oracle));

        let filters = AgentFilters {
            agent_type: Some(vec![AgentType::Marketplace]),
            ..Default::default()
        };
        assert!(!filters.matches(&oracle));
    }

    #[test]
    fn test_tag_overlap() {
        let mut agent = test_agent("a", "u1", true);
        agent.tags = vec!["defi".to_string(), "solana".to_string()];

        let filters = AgentFilters {
            tags: Some(vec!["nft".to_string(), "defi".to_string()]),
            ..Default::default()
        };
        assert!(filters.matches(&agent));

        let filters = AgentFilters {
            tags: Some(vec!["nft".to_string()]),
            ..Default::default()
        };
        assert!(!filters.matches(&agent));
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_description() {
        let mut agent = test_agent("a", "u1", true);
        agent.name = "Arbitrage-Bot".to_string();
        agent.description = "watches spreads across venues".to_string();

        let by_name = AgentFilters {
            search: Some("arbitrage".to_string()),
            ..Default::default()
        };
        assert!(by_name.matches(&agent));

        let by_description = AgentFilters {
            search: Some("SPREADS".to_string()),
            ..Default::default()
        };
        assert!(by_description.matches(&agent));

        let miss = AgentFilters {
            search: Some("oracle".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&agent));
    }

    #[test]
    fn test_min_reputation_is_inclusive() {
        let mut agent = test_agent("a", "u1", true);
        agent.reputation.score = 70;

        let at = AgentFilters {
            min_reputation: Some(70.0),
            ..Default::default()
        };
        assert!(at.matches(&agent));

        let above = AgentFilters {
            min_reputation: Some(70.5),
            ..Default::default()
        };
        assert!(!above.matches(&agent));
    }

    #[test]
    fn test_sort_by_activity_treats_missing_as_epoch() {
        let mut never_active = test_agent("a", "u1", true);
        never_active.last_active_at = None;
        let mut recently_active = test_agent("b", "u1", true);
        recently_active.last_active_at =
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());

        let mut agents = vec![recently_active, never_active];
        let filters = AgentFilters {
            sort_by: Some(SortBy::Activity),
            ..Default::default()
        };
        filters.sort(&mut agents);
        assert_eq!(agents[0].id, "a");
        assert_eq!(agents[1].id, "b");
    }

    #[test]
    fn test_sort_desc_reverses() {
        let mut low = test_agent("a", "u1", true);
        low.reputation.score = 10;
        let mut high = test_agent("b", "u1", true);
        high.reputation.score = 90;

        let mut agents = vec![low, high];
        let filters = AgentFilters {
            sort_by: Some(SortBy::Reputation),
            sort_order: Some(SortOrder::Desc),
            ..Default::default()
        };
        filters.sort(&mut agents);
        assert_eq!(agents[0].id, "b");
    }
}
