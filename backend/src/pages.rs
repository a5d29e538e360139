use axum::{extract::Path, http::StatusCode, response::Html};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::session::SessionView;

// --- Page Shell ---

/// render_page
///
/// Wraps a page body in the storefront shell. The navigation reflects the session
/// view the handler was given; nothing here reads cookies.
fn render_page(title: &str, body: &str, session: &SessionView) -> Html<String> {
    let account_links = match (session.authenticated, session.display_name()) {
        (true, name) => {
            let greeting = name
                .map(|name| format!("<span class=\"greeting\">Hello, {}</span>", encode_text(name)))
                .unwrap_or_default();
            let admin_link = if session.is_admin() {
                "<a href=\"/admin\">Back-office</a>"
            } else {
                ""
            };
            format!(
                "{greeting}<a href=\"/user/dashboard\">My account</a>{admin_link}\
                 <a href=\"/favorites\">Favorites</a><a href=\"/cart\">Cart</a>\
                 <button data-action=\"logout\">Log out</button>"
            )
        }
        (false, _) => "<a href=\"/login\">Log in</a><a href=\"/register\">Sign up</a>".to_string(),
    };

    Html(format!(
        "<!doctype html>\
         <html lang=\"en\">\
         <head><meta charset=\"utf-8\"><title>{title} | Petals By You</title>\
         <link rel=\"icon\" href=\"/favicon.ico\">\
         <link rel=\"stylesheet\" href=\"/assets/app.css\"></head>\
         <body>\
         <nav><a href=\"/\">Petals By You</a><a href=\"/shop\">Shop</a>\
         <a href=\"/build-bouquet\">Build a bouquet</a><a href=\"/about\">About</a>\
         <a href=\"/contact\">Contact</a>{account_links}</nav>\
         <main><h1>{title}</h1>{body}</main>\
         <script src=\"/assets/app.js\" defer></script>\
         </body></html>",
        title = encode_text(title),
    ))
}

// --- Public Pages ---

pub async fn home(session: SessionView) -> Html<String> {
    render_page(
        "Fresh flowers, delivered",
        "<section id=\"featured\"></section>",
        &session,
    )
}

pub async fn shop(session: SessionView) -> Html<String> {
    render_page("Shop", "<section id=\"catalog\"></section>", &session)
}

pub async fn products(session: SessionView) -> Html<String> {
    render_page("All products", "<section id=\"gallery\"></section>", &session)
}

/// [Public Route] A single product. The slug is echoed into the markup for the
/// gallery script, so it is escaped.
pub async fn product_detail(session: SessionView, Path(slug): Path<String>) -> Html<String> {
    let body = format!(
        "<section id=\"product\" data-slug=\"{}\"></section>",
        encode_double_quoted_attribute(&slug)
    );
    render_page("Product", &body, &session)
}

pub async fn about(session: SessionView) -> Html<String> {
    render_page("About us", "<section id=\"story\"></section>", &session)
}

pub async fn contact(session: SessionView) -> Html<String> {
    render_page("Contact", "<form id=\"contact-form\"></form>", &session)
}

pub async fn forgot_password(session: SessionView) -> Html<String> {
    render_page(
        "Forgot password",
        "<form id=\"forgot-password-form\" data-endpoint=\"/api/session/forgot-password\"></form>",
        &session,
    )
}

pub async fn reset_password(session: SessionView) -> Html<String> {
    render_page(
        "Reset password",
        "<form id=\"reset-password-form\" data-endpoint=\"/api/session/reset-password\"></form>",
        &session,
    )
}

// --- Auth-only Pages ---

pub async fn login(session: SessionView) -> Html<String> {
    render_page(
        "Log in",
        "<form id=\"login-form\" data-endpoint=\"/api/session/login\"></form>\
         <a href=\"/forgot-password\">Forgot your password?</a>",
        &session,
    )
}

pub async fn register(session: SessionView) -> Html<String> {
    render_page(
        "Create an account",
        "<form id=\"register-form\" data-endpoint=\"/api/session/register\"></form>",
        &session,
    )
}

// --- Protected Pages ---

pub async fn user_dashboard(session: SessionView) -> Html<String> {
    render_page("My account", "<section id=\"orders\"></section>", &session)
}

pub async fn user_profile(session: SessionView) -> Html<String> {
    render_page("My profile", "<form id=\"profile-form\"></form>", &session)
}

pub async fn cart(session: SessionView) -> Html<String> {
    render_page("Cart", "<section id=\"cart\"></section>", &session)
}

pub async fn favorites(session: SessionView) -> Html<String> {
    render_page("Favorites", "<section id=\"favorites\"></section>", &session)
}

pub async fn build_bouquet(session: SessionView) -> Html<String> {
    render_page(
        "Build a bouquet",
        "<section id=\"bouquet-builder\"></section>",
        &session,
    )
}

pub async fn checkout(session: SessionView) -> Html<String> {
    render_page("Checkout", "<form id=\"checkout-form\"></form>", &session)
}

pub async fn checkout_success(session: SessionView) -> Html<String> {
    render_page("Thank you!", "<p>Your order is on its way.</p>", &session)
}

// --- Admin Pages ---

pub async fn admin_dashboard(session: SessionView) -> Html<String> {
    render_page("Back-office", "<section id=\"admin-stats\"></section>", &session)
}

pub async fn admin_items(session: SessionView) -> Html<String> {
    render_page("Manage items", "<section id=\"admin-items\"></section>", &session)
}

pub async fn admin_users(session: SessionView) -> Html<String> {
    render_page("Manage users", "<section id=\"admin-users\"></section>", &session)
}

// --- Fallback ---

pub async fn not_found(session: SessionView) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        render_page(
            "Page not found",
            "<p>We couldn't find that page. <a href=\"/shop\">Browse the shop</a>.</p>",
            &session,
        ),
    )
}
