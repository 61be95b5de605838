//! Renders topic cards as the JS object literals the target file's
//! `hotTopics` array holds.

use moltsync_core::TopicCard;

/// One object literal per card, indented for an array body two levels
/// deep. Fields are already escaped; this only lays out the shape.
pub fn render_cards(cards: &[TopicCard]) -> String {
    cards.iter().map(render_card).collect::<Vec<_>>().join("\n")
}

fn render_card(card: &TopicCard) -> String {
    format!(
        "    {{\n      tag: '{}',\n      tagColor: '{}',\n      author: '{}',\n      title: '{}',\n      description: '{}',\n      votes: '{}',\n      comments: {},\n      postId: '{}',\n    }},",
        card.tag,
        card.tag_color,
        card.author,
        card.title,
        card.description,
        card.votes,
        card.comments,
        card.post_id,
    )
}
