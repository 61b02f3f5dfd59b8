//! List items example - anchor, siblings, join, map, reduce

use finder::{all_text, pred, Finder, ReduceStep};

const PAGE: &str = r#"
<html><body>
  <ul id="menu">
    <li class="item">Home</li>
    <li class="item selected">Docs<span>new</span></li>
    <li class="item">Blog</li>
    <li class="item">Blog</li>
  </ul>
</body></html>
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (RUST_LOG=finder=trace shows every stage)
    tracing_subscriber::fmt::init();

    let top = Finder::parse_html(PAGE);

    // Single lookups chain without checks
    let selected = top.find_by_id("menu").find_by_class("selected");
    println!("Selected: {}", selected);
    println!("Missing: {:?}", top.find_by_id("footer").find_element("li"));

    // Anchor on the first <li>, then walk its siblings
    let (items, found) = top.find_with_siblings(pred::class("item"));
    println!("Found items: {}", found);

    // Text of every item, duplicates in a row collapsed, upper-cased
    let labels = items
        .join(all_text)
        .reduce(|prev, next| {
            if prev.data() == next.data() {
                ReduceStep::Drop
            } else {
                ReduceStep::Keep
            }
        })
        .map(|node| node.data.make_ascii_uppercase())
        .collect()
        .await;

    for label in &labels {
        println!("Label: {}", label.data());
    }

    // The tree itself is untouched
    let first = top.find(pred::inner_text("Home"));
    println!("Original: {}", first);

    Ok(())
}
