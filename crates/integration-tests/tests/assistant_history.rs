//! Tests for mapping client chat history into model conversation turns.

use mandi_api::services::assistant::{ChatTurn, contents_from_history};

fn turn(from: &str, text: &str) -> ChatTurn {
    ChatTurn {
        from: from.to_owned(),
        text: text.to_owned(),
    }
}

#[test]
fn farmer_turns_become_user_turns_and_the_rest_become_model_turns() {
    let history = vec![
        turn("farmer", "Tamatar ka rate kya chal raha hai?"),
        turn("bot", "Aaj ka rate 22-25 rupaye kilo hai."),
        turn("farmer", "Kal bechna theek rahega?"),
    ];

    let contents = contents_from_history(&history, "Aur mandi kaunsi sahi hai?");

    let roles: Vec<_> = contents
        .iter()
        .map(|c| c.role.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(roles, ["user", "model", "user", "user"]);
}

#[test]
fn the_new_message_is_always_the_final_user_turn() {
    let contents = contents_from_history(&[], "namaste");
    assert_eq!(contents.len(), 1);

    let last = contents.last().expect("non-empty");
    assert_eq!(last.role.as_deref(), Some("user"));
}

#[test]
fn history_order_is_preserved() {
    let history = vec![turn("farmer", "first"), turn("bot", "second")];
    let contents = contents_from_history(&history, "third");

    let texts: Vec<String> = contents
        .iter()
        .map(|c| serde_json::to_value(c).expect("serialize")["parts"][0]["text"]
            .as_str()
            .expect("text part")
            .to_owned())
        .collect();
    assert_eq!(texts, ["first", "second", "third"]);
}
