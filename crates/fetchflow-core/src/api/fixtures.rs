//! Built-in sample collections for offline runs.
//!
//! Ten users with the names and emails of the public JSONPlaceholder data
//! set, and a deterministic post list with an uneven spread per user.

use super::{Post, User};

const USERS: [(&str, &str, &str); 10] = [
    ("Leanne Graham", "Bret", "Sincere@april.biz"),
    ("Ervin Howell", "Antonette", "Shanna@melissa.tv"),
    ("Clementine Bauch", "Samantha", "Nathan@yesenia.net"),
    ("Patricia Lebsack", "Karianne", "Julianne.OConner@kory.org"),
    ("Chelsey Dietrich", "Kamren", "Lucio_Hettinger@annie.ca"),
    ("Mrs. Dennis Schulist", "Leopoldo_Corkery", "Karley_Dach@jasper.info"),
    ("Kurtis Weissnat", "Elwyn.Skiles", "Telly.Hoeger@billy.biz"),
    ("Nicholas Runolfsdottir V", "Maxime_Nienow", "Sherwood@rosamond.me"),
    ("Glenna Reichert", "Delphine", "Chaim_McDermott@dana.io"),
    ("Clementina DuBuque", "Moriah.Stanton", "Rey.Padberg@karina.biz"),
];

const TITLES: [&str; 8] = [
    "sunt aut facere repellat provident occaecati",
    "qui est esse",
    "ea molestias quasi exercitationem repellat qui ipsa sit aut",
    "eum et est occaecati",
    "nesciunt quas odio",
    "dolorem eum magni eos aperiam quia",
    "magnam facilis autem",
    "dolorem dolore est ipsam",
];

const BODY: &str = "quia et suscipit\nsuscipit recusandae consequuntur expedita et cum";

pub(crate) fn users() -> Vec<User> {
    USERS
        .iter()
        .enumerate()
        .map(|(i, (name, username, email))| User {
            id: i as u64 + 1,
            name: name.to_string(),
            username: username.to_string(),
            email: email.to_string(),
        })
        .collect()
}

/// User `u` gets `2 + (u * 3) % 5` posts; ids are assigned in user order.
pub(crate) fn posts() -> Vec<Post> {
    let mut posts = Vec::new();
    let mut next_id = 1u64;
    for user_id in 1..=USERS.len() as u64 {
        let count = 2 + (user_id * 3) % 5;
        for _ in 0..count {
            posts.push(Post {
                id: next_id,
                user_id,
                title: TITLES[(next_id as usize - 1) % TITLES.len()].to_string(),
                body: BODY.to_string(),
            });
            next_id += 1;
        }
    }
    posts
}
