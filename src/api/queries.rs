//! GraphQL documents sent to the start.gg API.

pub const PLAYER_RECENT_SETS_QUERY: &str = r#"
query PlayerRecentSets($playerId: ID!, $perPage: Int!) {
  player(id: $playerId) {
    id
    gamerTag
    prefix
    sets(perPage: $perPage) {
      nodes {
        id
        winnerId
        completedAt
        displayScore
        fullRoundText
        event {
          name
          tournament { id name slug startAt }
        }
        slots {
          entrant {
            id
            name
            participants {
              id
              gamerTag
              prefix
              user { slug }
            }
          }
        }
      }
    }
  }
}
"#;

pub const USER_BY_SLUG_QUERY: &str = r#"
query UserBySlug($slug: String!) {
  user(slug: $slug) {
    id
    slug
    name
    player {
      id
      gamerTag
      prefix
    }
  }
}
"#;

pub const RECENT_TOURNAMENTS_QUERY: &str = r#"
query RecentTournaments($perPage: Int!) {
  tournaments(query: {
    perPage: $perPage
    sortBy: "startAt desc"
    filter: { past: false }
  }) {
    nodes {
      id
      name
      slug
      startAt
    }
  }
}
"#;

pub const TOURNAMENT_ENTRANTS_QUERY: &str = r#"
query TournamentEntrants($slug: String!, $perPage: Int!, $filter: String) {
  tournament(slug: $slug) {
    id
    name
    participants(query: {
      perPage: $perPage
      filter: { gamerTag: $filter }
    }) {
      nodes {
        id
        gamerTag
        prefix
        user { slug }
      }
    }
  }
}
"#;
