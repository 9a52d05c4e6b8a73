use std::path::Path;
use wayfarer_planner::{export::save_title_document, Category};

mod common;

#[tokio::main]
async fn main() {
    common::init_tracing();

    let destination = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Osaka".to_string());
    let planner = common::get_planner();

    let titles = match planner.generate_titles(&destination).await {
        Ok(titles) => titles,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    for category in Category::ALL {
        println!("■ {}", category.label());
        for (i, title) in titles.category(category).iter().enumerate() {
            println!("{}. {title}", i + 1);
        }
        println!();
    }

    let path = save_title_document(Path::new("."), &destination, &titles)
        .await
        .unwrap();
    println!("Saved to {}", path.display());
}
