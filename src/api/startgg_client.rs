use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::settings::ApiSettings;
use crate::domain::models::{Id, ParticipantNode, Player, SetNode, TournamentRef};
use crate::http::RateLimitedClient;

use super::queries;

/// Source of per-player match histories. The reconciler depends on this
/// seam rather than on the concrete client.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Most recent completed sets for a player, newest first
    async fn fetch_recent_sets(&self, player_id: &str, limit: usize) -> Result<Vec<SetNode>>;
}

/// A player's identity together with their recently fetched sets
#[derive(Debug, Clone)]
pub struct PlayerOverview {
    pub player: Player,
    pub sets: Vec<SetNode>,
}

/// start.gg GraphQL API client
pub struct StartGgClient {
    client: RateLimitedClient,
    endpoint: String,
}

impl StartGgClient {
    /// Create a new client; the API token is read from the environment
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let token = std::env::var(settings.token_env)
            .with_context(|| format!("{} is not set", settings.token_env))?;

        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
            token,
        )?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.to_string(),
        })
    }

    /// Fetch a player's identity and recent sets in one query
    pub async fn fetch_player_overview(
        &self,
        player_id: &str,
        limit: usize,
    ) -> Result<PlayerOverview> {
        let data: PlayerSetsData = self
            .post_query(
                queries::PLAYER_RECENT_SETS_QUERY,
                json!({ "playerId": player_id, "perPage": limit }),
            )
            .await?;

        let node = data
            .player
            .ok_or_else(|| anyhow!("Player {} not found", player_id))?;

        let player = Player {
            id: node.id,
            gamer_tag: node.gamer_tag.unwrap_or_else(|| "Unknown".to_string()),
            prefix: node.prefix,
            user_slug: None,
        };
        let sets = node.sets.and_then(|s| s.nodes).unwrap_or_default();
        debug!("Fetched {} sets for player {}", sets.len(), player.gamer_tag);

        Ok(PlayerOverview { player, sets })
    }

    /// Resolve a user profile slug (e.g. "user/2a371960") to a player
    pub async fn fetch_user_by_slug(&self, slug: &str) -> Result<Option<Player>> {
        let data: UserBySlugData = self
            .post_query(queries::USER_BY_SLUG_QUERY, json!({ "slug": slug }))
            .await?;

        let Some(user) = data.user else {
            return Ok(None);
        };

        // Prefer the player entity; fall back to the bare user account
        let (id, gamer_tag, prefix) = match user.player {
            Some(player) => (
                player.id,
                player
                    .gamer_tag
                    .or(user.name)
                    .unwrap_or_else(|| "Unknown".to_string()),
                player.prefix,
            ),
            None => (
                user.id,
                user.name.unwrap_or_else(|| "Unknown".to_string()),
                None,
            ),
        };

        Ok(Some(Player {
            id,
            gamer_tag,
            prefix,
            user_slug: user.slug,
        }))
    }

    /// Recently listed tournaments, soonest first
    pub async fn fetch_recent_tournaments(&self, limit: usize) -> Result<Vec<TournamentRef>> {
        let data: TournamentsData = self
            .post_query(queries::RECENT_TOURNAMENTS_QUERY, json!({ "perPage": limit }))
            .await?;

        Ok(data.tournaments.and_then(|t| t.nodes).unwrap_or_default())
    }

    /// Search a tournament's entrants by gamer tag
    pub async fn fetch_tournament_entrants(
        &self,
        tournament_slug: &str,
        filter: &str,
        limit: usize,
    ) -> Result<Vec<Player>> {
        let data: TournamentEntrantsData = self
            .post_query(
                queries::TOURNAMENT_ENTRANTS_QUERY,
                json!({ "slug": tournament_slug, "perPage": limit, "filter": filter }),
            )
            .await?;

        let nodes = data
            .tournament
            .and_then(|t| t.participants)
            .and_then(|p| p.nodes)
            .unwrap_or_default();

        Ok(nodes.into_iter().filter_map(participant_to_player).collect())
    }

    async fn post_query<T: DeserializeOwned>(
        &self,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let body = json!({ "query": document, "variables": variables });
        let response: GraphQlResponse<T> = self.client.post_json(&self.endpoint, &body).await?;

        if let Some(errors) = &response.errors {
            if let Some(first) = errors.first() {
                anyhow::bail!(
                    "start.gg returned {} GraphQL error(s): {}",
                    errors.len(),
                    first.message
                );
            }
        }

        response
            .data
            .ok_or_else(|| anyhow!("GraphQL response carried neither data nor errors"))
    }
}

#[async_trait]
impl MatchSource for StartGgClient {
    async fn fetch_recent_sets(&self, player_id: &str, limit: usize) -> Result<Vec<SetNode>> {
        Ok(self.fetch_player_overview(player_id, limit).await?.sets)
    }
}

fn participant_to_player(node: ParticipantNode) -> Option<Player> {
    Some(Player {
        id: node.id?,
        gamer_tag: node.gamer_tag?,
        prefix: node.prefix,
        user_slug: node.user.and_then(|u| u.slug),
    })
}

// --- Response envelopes ---

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct PlayerSetsData {
    player: Option<PlayerSetsNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerSetsNode {
    id: Id,
    gamer_tag: Option<String>,
    #[serde(default)]
    prefix: Option<String>,
    sets: Option<SetConnection>,
}

#[derive(Deserialize)]
struct SetConnection {
    nodes: Option<Vec<SetNode>>,
}

#[derive(Deserialize)]
struct UserBySlugData {
    user: Option<UserNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    id: Id,
    slug: Option<String>,
    name: Option<String>,
    player: Option<UserPlayerNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPlayerNode {
    id: Id,
    gamer_tag: Option<String>,
    prefix: Option<String>,
}

#[derive(Deserialize)]
struct TournamentsData {
    tournaments: Option<TournamentConnection>,
}

#[derive(Deserialize)]
struct TournamentConnection {
    nodes: Option<Vec<TournamentRef>>,
}

#[derive(Deserialize)]
struct TournamentEntrantsData {
    tournament: Option<TournamentEntrantsNode>,
}

#[derive(Deserialize)]
struct TournamentEntrantsNode {
    participants: Option<ParticipantConnection>,
}

#[derive(Deserialize)]
struct ParticipantConnection {
    nodes: Option<Vec<ParticipantNode>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_envelope_decodes_data() {
        let body = r#"{"data":{"player":{"id":1001,"gamerTag":"Zain","sets":{"nodes":[
            {"id":"s-1","winnerId":5,"completedAt":1700000000,"slots":[]}
        ]}}}}"#;

        let response: GraphQlResponse<PlayerSetsData> = serde_json::from_str(body).unwrap();
        let player = response.data.unwrap().player.unwrap();
        assert_eq!(player.id, Id::from("1001"));
        let sets = player.sets.unwrap().nodes.unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].winner_id, Some(Id::from("5")));
    }

    #[test]
    fn test_graphql_envelope_decodes_errors() {
        let body = r#"{"errors":[{"message":"An unknown error has occurred"}]}"#;

        let response: GraphQlResponse<PlayerSetsData> = serde_json::from_str(body).unwrap();
        assert!(response.data.is_none());
        assert_eq!(response.errors.unwrap().len(), 1);
    }

    #[test]
    fn test_participant_without_id_is_skipped() {
        let node = ParticipantNode {
            id: None,
            gamer_tag: Some("Ghost".to_string()),
            prefix: None,
            user: None,
        };
        assert!(participant_to_player(node).is_none());
    }
}
