use crate::domain::models::{ParticipantNode, Player, SetNode, SlotNode};

/// Decide whether a participant record refers to `player`.
///
/// Precedence-ordered: participant id, then gamer tag (case-insensitive),
/// then user slug. Ids are sometimes absent, or inconsistent between the
/// two fetches that cover the same set, and the later keys recover matches
/// the id comparison misses. Tag comparison is a heuristic; distinct
/// players sharing a tag are not detected.
pub fn participant_matches(participant: &ParticipantNode, player: &Player) -> bool {
    if participant
        .id
        .as_ref()
        .is_some_and(|id| *id == player.id)
    {
        return true;
    }

    if participant
        .gamer_tag
        .as_ref()
        .is_some_and(|tag| tag.to_lowercase() == player.gamer_tag.to_lowercase())
    {
        return true;
    }

    match (
        participant.user.as_ref().and_then(|u| u.slug.as_deref()),
        player.user_slug.as_deref(),
    ) {
        (Some(participant_slug), Some(player_slug)) => participant_slug == player_slug,
        _ => false,
    }
}

/// The slot `player` competed in, if any
pub fn find_player_slot<'a>(set: &'a SetNode, player: &Player) -> Option<&'a SlotNode> {
    set.slots.iter().flatten().find(|slot| {
        slot.entrant.as_ref().is_some_and(|entrant| {
            entrant
                .participants
                .iter()
                .flatten()
                .any(|participant| participant_matches(participant, player))
        })
    })
}

/// Whether `player` appears on either side of the set
pub fn set_involves(set: &SetNode, player: &Player) -> bool {
    find_player_slot(set, player).is_some()
}
