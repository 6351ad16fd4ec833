// Unit tests for Match Deck

use match_deck::models::{
    CandidateCard, CardKey, FaceState, Interest, MatchLink, PendingWrite, UserProfile, VerdictState,
    VerdictWrite,
};
use match_deck::services::{DirectoryError, InMemoryDirectory, MatchDirectory, UserDirectory};

#[test]
fn test_face_transition_table() {
    let cases = [
        (FaceState::Front, FaceState::FrontToBack, FaceState::Front),
        (FaceState::FrontToBack, FaceState::FrontToBack, FaceState::Back),
        (FaceState::Back, FaceState::BackToFront, FaceState::Back),
        (FaceState::BackToFront, FaceState::BackToFront, FaceState::Front),
    ];

    for (from, after_start, after_complete) in cases {
        assert_eq!(from.start_flip(), after_start, "start_flip from {:?}", from);
        assert_eq!(from.complete_flip(), after_complete, "complete_flip from {:?}", from);
    }
}

#[test]
fn test_card_flip_updates_face() {
    let mut card = CandidateCard::new(UserProfile::new(4), "http://placeholder.test/a.jpg");

    assert_eq!(card.start_flip(), FaceState::FrontToBack);
    assert_eq!(card.face, FaceState::FrontToBack);
    assert_eq!(card.complete_flip(), FaceState::Back);
    // flips never touch the verdict
    assert_eq!(card.verdict, VerdictState::None);
}

#[test]
fn test_remove_opposite_verdict_first() {
    let like = VerdictState::Disliked.transition(Interest::Like);
    assert_eq!(like.writes.first(), Some(&VerdictWrite::UnDislike));

    let dislike = VerdictState::Liked.transition(Interest::Dislike);
    assert_eq!(dislike.writes.first(), Some(&VerdictWrite::Unlike));
    assert_eq!(dislike.next, VerdictState::Disliked);
}

#[test]
fn test_like_then_clear_sequence() {
    let state = VerdictState::None.transition(Interest::Like).next;
    let state = state.transition(Interest::Clear).next;
    assert_eq!(state, VerdictState::None);
}

#[test]
fn test_card_serialization_names() {
    let mut card = CandidateCard::new(UserProfile::new(8).with_photo("http://cdn.test/8.png"), "unused");
    card.verdict = VerdictState::Disliked;
    card.face = FaceState::BackToFront;

    let json = serde_json::to_value(&card).unwrap();
    assert_eq!(json["verdict"], "disliked");
    assert_eq!(json["face"], "back-front");
    assert_eq!(json["user"]["photoUrl"], "http://cdn.test/8.png");
}

#[test]
fn test_pending_write_serialization() {
    let write = PendingWrite::new(1, 2, VerdictWrite::UnDislike);
    assert_eq!(write.attempts, 0);

    let json = serde_json::to_value(&write).unwrap();
    assert_eq!(json["userId"], 1);
    assert_eq!(json["otherId"], 2);
    assert_eq!(json["kind"], "undislike");

    let back: PendingWrite = serde_json::from_value(json).unwrap();
    assert_eq!(back, write);
}

#[test]
fn test_card_key_display() {
    assert_eq!(CardKey(42).to_string(), "42");
    assert_eq!(CardKey::from(7), CardKey(7));
}

#[test]
fn test_link_keeps_opaque_fields() {
    let link: MatchLink =
        serde_json::from_str(r#"{"href":"/users/3","rel":"self","templated":false}"#).unwrap();
    assert_eq!(link.href, "/users/3");
    assert_eq!(link.extra["rel"], "self");
}

#[test]
fn test_in_memory_user_lookup() {
    let directory = InMemoryDirectory::new()
        .with_current_user(UserProfile::new(1))
        .with_candidate(1, UserProfile::new(2));

    let user = tokio_test::block_on(directory.get_user(2)).unwrap();
    assert_eq!(user.id, 2);

    let err = tokio_test::block_on(directory.get_user(99)).unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound(_)));
}

#[test]
fn test_in_memory_send_dispatches_by_kind() {
    let directory = InMemoryDirectory::new();

    tokio_test::block_on(directory.send(&PendingWrite::new(1, 5, VerdictWrite::Dislike))).unwrap();

    assert!(tokio_test::block_on(directory.is_disliked(1, 5)));
    assert_eq!(
        tokio_test::block_on(directory.writes()),
        vec![(VerdictWrite::Dislike, 1, 5)]
    );
}
