//! `GET /sitemap.xml` for search engines.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use sqlx::PgPool;
use sweetbox_core::sitemap::{render, static_pages, SitemapEntry};
use sweetbox_db::repositories::{CategoryRepo, ProductRepo};

use crate::error::AppResult;
use crate::state::AppState;

async fn build_sitemap(pool: &PgPool, site_url: &str) -> Result<String, sqlx::Error> {
    let (categories, products) =
        tokio::try_join!(CategoryRepo::list(pool, false), ProductRepo::list_public(pool))?;

    let mut entries = static_pages();
    entries.extend(categories.into_iter().map(|c| {
        SitemapEntry::new(format!("/menu/{}", c.slug), "weekly", 0.8).with_lastmod(c.updated_at)
    }));
    entries.extend(products.into_iter().map(|p| {
        SitemapEntry::new(format!("/products/{}", p.slug), "weekly", 0.7)
            .with_lastmod(p.updated_at)
    }));

    Ok(render(site_url, &entries))
}

/// GET /sitemap.xml
pub async fn sitemap(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pool = state.pool.clone();
    let site_url = state.config.site_url.clone();
    let xml = state
        .caches
        .sitemap
        .get_or_try_insert_with((), || async move { build_sitemap(&pool, &site_url).await })
        .await?;

    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], xml))
}
