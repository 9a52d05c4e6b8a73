use wayfarer_planner::Category;

mod common;

#[tokio::main]
async fn main() {
    common::init_tracing();

    let theme = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "warm beaches in winter".to_string());
    let planner = common::get_planner();

    let cities = planner.recommend_cities(&theme).await.unwrap();
    for (i, city) in cities.iter().enumerate() {
        println!("{}. {city}", i + 1);
    }

    // Pick the first recommendation and draft its titles.
    let titles = planner.generate_titles_for_recommendation(0).await.unwrap();
    println!("\n{}", cities[0]);
    for title in titles.category(Category::Hotspots).iter().take(5) {
        println!("- {title}");
    }
}
