//! Sample catalogue inserted into an empty store at startup.

use super::domain::NewComic;

fn sample(
    title: &str,
    author: &str,
    publisher: &str,
    year: i32,
    description: &str,
    price: f64,
    in_stock: bool,
) -> NewComic {
    NewComic {
        title: Some(title.into()),
        author: Some(author.into()),
        publisher: Some(publisher.into()),
        year: Some(year),
        genre: Some("Superhero".into()),
        description: Some(description.into()),
        price: Some(price),
        in_stock: Some(in_stock),
    }
}

pub fn sample_comics() -> Vec<NewComic> {
    vec![
        sample(
            "Spider-Man: No Way Home",
            "Stan Lee",
            "Marvel Comics",
            2021,
            "Peter Parker's identity is revealed and he seeks help from Doctor Strange.",
            15.99,
            true,
        ),
        sample(
            "Batman: The Dark Knight Returns",
            "Frank Miller",
            "DC Comics",
            1986,
            "An aged Batman comes out of retirement in a dystopian future.",
            24.99,
            true,
        ),
        sample(
            "Watchmen",
            "Alan Moore",
            "DC Comics",
            1987,
            "A complex tale of retired superheroes in an alternate 1985.",
            29.99,
            false,
        ),
    ]
}
