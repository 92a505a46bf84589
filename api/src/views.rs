//! Server-rendered HTML pages.
//!
//! Pages are maud templates; every interpolated value is escaped by maud.
//! Each page goes through [`layout`], which draws the navigation bar for the
//! current user.

use axum::response::Html;
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    dto::{PostPage, ProfileResponse},
    models::{Post, SessionUser},
};

const DELETE_SCRIPT: &str = r#"
      document.querySelectorAll(".delete").forEach((el) => {
        el.addEventListener("click", (e) => {
          fetch("/posts/delete", {
            method: "DELETE",
            headers: { "Content-Type": "application/json" },
            body: JSON.stringify({ _id: e.target.dataset.id }),
          }).then((r) => {
            if (r.ok) e.target.closest(".list-box").remove();
          });
        });
      });
"#;

fn display_name(user: &SessionUser) -> &str {
    if user.nickname.is_empty() {
        &user.email
    } else {
        &user.nickname
    }
}

fn nav(user: Option<&SessionUser>) -> Markup {
    html! {
        nav class="nav" {
            a class="logo" href="/" { "Forum" }
            a href="/posts/list" { "List" }
            a href="/posts/write" { "Write" }
            @match user {
                Some(user) => {
                    a href={ "/profile/" (user.id.to_hex()) } { (display_name(user)) }
                    form class="inline" method="post" action="/logout" {
                        button type="submit" { "Logout" }
                    }
                }
                None => {
                    a href="/login" { "Login" }
                    a href="/register" { "Register" }
                }
            }
        }
    }
}

fn layout(title: &str, user: Option<&SessionUser>, body: Markup) -> Html<String> {
    let page = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link href="/main.css" rel="stylesheet";
            }
            body class="grey-bg" {
                (nav(user))
                (body)
            }
        }
    };
    Html(page.into_string())
}

pub fn home(user: Option<&SessionUser>) -> Html<String> {
    let greeting = html! {
        @if let Some(user) = user {
            h4 { "Welcome back, " (display_name(user)) }
        } @else {
            h4 { "Welcome to the forum" }
        }
    };
    layout("Forum", user, greeting)
}

pub fn list(page: &PostPage, user: Option<&SessionUser>) -> Html<String> {
    let body = html! {
        div class="white-bg" {
            @if page.posts.is_empty() {
                p class="empty" { "No posts yet." }
            }
            @for post in &page.posts {
                @let id = post.id.to_hex();
                div class="list-box" {
                    h4 {
                        a href={ "/posts/detail/" (id) } { (post.title) }
                        " "
                        a href={ "/posts/edit/" (id) } { "✏️" }
                        " "
                        span class="delete" data-id=(id) { "🗑️" }
                    }
                    p { (post.content) }
                }
            }
        }
        @if let Some(cursor) = &page.next_cursor {
            a class="next" href={ "/posts/list/" (cursor) } { "Next" }
        }
        script { (PreEscaped(DELETE_SCRIPT)) }
    };
    layout("Posts", user, body)
}

pub fn write(user: Option<&SessionUser>) -> Html<String> {
    let body = html! {
        form class="form-box" action="/posts/add" method="POST" enctype="multipart/form-data" {
            h4 { "Write a post" }
            input name="title" placeholder="Title";
            textarea name="content" placeholder="Content" {}
            input type="file" name="img1" accept="image/*";
            button type="submit" { "Post" }
        }
    };
    layout("Write", user, body)
}

pub fn detail(post: &Post, author: Option<&str>, user: Option<&SessionUser>) -> Html<String> {
    let body = html! {
        div class="detail-bg" {
            h4 { (post.title) }
            @if let Some(name) = author {
                p class="author" { "by " (name) }
            }
            @if let Some(url) = &post.img {
                img src=(url) alt="";
            }
            p { (post.content) }
            a href={ "/posts/edit/" (post.id.to_hex()) } { "Edit" }
        }
    };
    layout(&post.title, user, body)
}

pub fn edit(post: &Post, user: Option<&SessionUser>) -> Html<String> {
    let body = html! {
        form class="form-box" action={ "/posts/edit/" (post.id.to_hex()) } method="POST" {
            h4 { "Edit post" }
            input name="title" value=(post.title);
            textarea name="content" { (post.content) }
            button type="submit" { "Save" }
        }
    };
    layout("Edit", user, body)
}

pub fn login(user: Option<&SessionUser>) -> Html<String> {
    let body = html! {
        form class="form-box" action="/login" method="POST" {
            h4 { "Login" }
            input name="useremail" type="email" placeholder="Email";
            input name="password" type="password" placeholder="Password";
            button type="submit" { "Login" }
        }
    };
    layout("Login", user, body)
}

pub fn register(user: Option<&SessionUser>) -> Html<String> {
    let body = html! {
        form class="form-box" action="/register" method="POST" {
            h4 { "Register" }
            input name="useremail" type="email" placeholder="Email";
            input name="password" type="password" placeholder="Password";
            input name="confirm_password" type="password" placeholder="Confirm password";
            input name="username" placeholder="Name";
            input name="nickname" placeholder="Nickname";
            button type="submit" { "Register" }
        }
    };
    layout("Register", user, body)
}

pub fn profile(profile: &ProfileResponse, user: Option<&SessionUser>) -> Html<String> {
    let body = html! {
        div class="detail-bg" {
            h4 { (profile.nickname) }
            p { (profile.username) }
            p { (profile.email) }
            p { "Joined " (profile.joined) }
        }
    };
    layout("Profile", user, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn post(title: &str, content: &str) -> Post {
        Post {
            id: ObjectId::new(),
            title: title.into(),
            content: content.into(),
            img: None,
            author_id: None,
            created_at: 0,
        }
    }

    #[test]
    fn post_content_is_escaped() {
        let post = post("<script>alert(1)</script>", "Tom & Jerry");

        let Html(page) = detail(&post, None, None);
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("Tom &amp; Jerry"));
    }

    #[test]
    fn edit_form_attribute_is_escaped() {
        let post = post(r#"say "hi""#, "body");

        let Html(page) = edit(&post, None);
        assert!(page.contains(r#"value="say &quot;hi&quot;""#));
    }

    #[test]
    fn nav_reflects_session() {
        let user = SessionUser {
            id: ObjectId::new(),
            email: "kim@example.com".into(),
            username: "kim".into(),
            nickname: "kimchi".into(),
        };

        let Html(anonymous) = home(None);
        assert!(anonymous.contains(r#"href="/login""#));

        let Html(signed_in) = home(Some(&user));
        assert!(signed_in.contains("Welcome back, kimchi"));
        assert!(signed_in.contains(&format!("/profile/{}", user.id.to_hex())));
        assert!(!signed_in.contains(r#"href="/login""#));
    }

    #[test]
    fn list_links_next_page_only_with_cursor() {
        let page = PostPage {
            posts: vec![post("first", "one")],
            next_cursor: None,
        };
        let Html(html) = list(&page, None);
        assert!(html.contains("first"));
        assert!(!html.contains(r#"class="next""#));
    }
}
