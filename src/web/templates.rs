// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTML templates for the gallery and lightbox pages

use minijinja::Environment;
use serde::Serialize;

use crate::catalog::{Orientation, Photo, PhotoStore};
use crate::lightbox::{meta_line, LightboxView};
use crate::pagination::PageButton;
use crate::theme::Theme;
use crate::Result;

/// One tile in the grid
#[derive(Debug, Clone, Serialize)]
pub struct PhotoCard {
    /// Position in the filtered list
    pub index: usize,
    pub filename: String,
    pub title: String,
    pub description: String,
    pub meta: String,
    pub tags: Vec<String>,
    pub image_url: String,
    pub orientation: &'static str,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl PhotoCard {
    pub fn new(index: usize, photo: &Photo, store: &dyn PhotoStore) -> Self {
        Self {
            index,
            filename: photo.filename.clone(),
            title: photo.title.clone(),
            description: photo.description.clone(),
            meta: meta_line(photo),
            tags: photo.tags().to_vec(),
            image_url: store.url_for(&photo.filename),
            orientation: photo.orientation.unwrap_or(Orientation::Landscape).as_str(),
            width: photo.width,
            height: photo.height,
        }
    }
}

/// Values shared by every page
#[derive(Debug, Clone, Serialize)]
pub struct Chrome {
    pub query: String,
    pub theme: Theme,
    pub theme_icon: &'static str,
    pub year: i32,
}

#[derive(Debug, Serialize)]
pub struct GalleryPage {
    pub chrome: Chrome,
    pub cards: Vec<PhotoCard>,
    pub pagination: Vec<PageButton>,
    pub page: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct LightboxPage {
    pub chrome: Chrome,
    pub view: LightboxView,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    /// Gallery page that holds this photo
    pub close_page: usize,
}

const BASE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Gallery{% endblock %} - Photofolio</title>
    <style>
        :root {
            --bg-primary: #f5f5f7;
            --bg-card: #ffffff;
            --text-primary: #1d1d1f;
            --text-secondary: #6e6e73;
            --accent: #e94560;
            --border: #d2d2d7;
        }
        body.dark-mode {
            --bg-primary: #1a1a2e;
            --bg-card: #0f3460;
            --text-primary: #e8e8e8;
            --text-secondary: #a0a0a0;
            --border: #2a2a4a;
        }
        * { box-sizing: border-box; margin: 0; padding: 0; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: var(--bg-primary);
            color: var(--text-primary);
            line-height: 1.6;
        }
        header {
            display: flex;
            align-items: center;
            gap: 20px;
            padding: 15px 20px;
            border-bottom: 1px solid var(--border);
        }
        header .logo { font-size: 1.5em; font-weight: bold; color: var(--accent); text-decoration: none; }
        header form.search { flex: 1; }
        header input[type=search] {
            width: 100%;
            padding: 8px 12px;
            border-radius: 8px;
            border: 1px solid var(--border);
            background: var(--bg-card);
            color: var(--text-primary);
        }
        #theme-toggle-btn { font-size: 1.3em; background: none; border: none; cursor: pointer; }
        .container { max-width: 1400px; margin: 0 auto; padding: 20px; }
        #gallery {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(320px, 1fr));
            gap: 20px;
        }
        .gallery-item { background: var(--bg-card); border-radius: 12px; overflow: hidden; }
        .gallery-item a.open { color: inherit; text-decoration: none; }
        .gallery-item img { width: 100%; height: 240px; object-fit: cover; display: block; }
        .gallery-item.portrait img { object-position: top; }
        .info { padding: 15px; }
        .meta { color: var(--text-secondary); font-size: 0.85em; margin: 6px 0; }
        .tags { display: flex; flex-wrap: wrap; gap: 4px; }
        .tag {
            background: var(--accent);
            color: white;
            padding: 2px 8px;
            border-radius: 12px;
            font-size: 0.8em;
        }
        .download-btn { display: inline-block; margin-top: 10px; color: var(--accent); }
        #pagination { display: flex; justify-content: center; gap: 6px; margin: 30px 0; }
        #pagination a, #pagination span {
            padding: 6px 12px;
            border: 1px solid var(--border);
            border-radius: 6px;
            color: var(--text-primary);
            text-decoration: none;
        }
        #pagination .active { background: var(--accent); color: white; }
        #pagination .disabled { opacity: 0.4; }
        .empty { color: var(--text-secondary); text-align: center; padding: 40px; }
        #lightbox {
            position: fixed;
            inset: 0;
            background: rgba(0, 0, 0, 0.9);
            display: flex;
            align-items: center;
            justify-content: center;
            gap: 20px;
        }
        #lightbox-img { max-width: 80vw; max-height: 70vh; }
        #lightbox-caption { color: #e8e8e8; text-align: center; margin-top: 15px; }
        #lightbox a.nav, #lightbox span.nav { color: white; font-size: 2.5em; text-decoration: none; padding: 0 10px; }
        #lightbox span.nav { opacity: 0.2; }
        #lightbox-close { position: absolute; top: 15px; right: 25px; color: white; font-size: 2em; text-decoration: none; }
        footer { text-align: center; color: var(--text-secondary); padding: 20px; }
    </style>
</head>
<body class="{% if chrome.theme == "dark" %}dark-mode{% endif %}">
    <header>
        <a href="/" class="logo">Photofolio</a>
        <form class="search" method="get" action="/">
            <input id="search-input" type="search" name="q" value="{{ chrome.query }}" placeholder="Search by title, description or tag">
        </form>
        <form method="post" action="/theme">
            <input type="hidden" name="return_to" value="{% block return_to %}/{% endblock %}">
            <button id="theme-toggle-btn" type="submit">{{ chrome.theme_icon }}</button>
        </form>
    </header>
    <main class="container">
        {% block content %}{% endblock %}
    </main>
    <footer>&copy; <span id="footer-year">{{ chrome.year }}</span> Photofolio</footer>
</body>
</html>"#;

const GALLERY: &str = r#"{% extends "base.html" %}
{% block return_to %}/?q={{ chrome.query | urlencode }}&amp;page={{ page }}{% endblock %}
{% block content %}
{% set q = chrome.query | urlencode %}
<div id="gallery">
    {% for card in cards %}
    <div class="gallery-item {{ card.orientation }}">
        <a class="open" href="/photos/{{ card.index }}?q={{ q }}">
            <img src="{{ card.image_url }}" alt="{{ card.title }}" loading="lazy"
                 {% if card.width %}width="{{ card.width }}" height="{{ card.height }}"{% endif %}>
        </a>
        <div class="info">
            <h2>{{ card.title }}</h2>
            <p>{{ card.description }}</p>
            <p class="meta">{{ card.meta }}</p>
            <div class="tags">
                {% for tag in card.tags %}<span class="tag">{{ tag }}</span>{% else %}<span class="tag">None</span>{% endfor %}
            </div>
            <div class="actions"><a href="{{ card.image_url }}" download class="download-btn">⬇️ Download</a></div>
        </div>
    </div>
    {% else %}
    <p class="empty">No photos match your search.</p>
    {% endfor %}
</div>
<nav id="pagination">
    {% for button in pagination %}
        {% if button.disabled %}
        <span class="disabled">{{ button.label }}</span>
        {% else %}
        <a href="/?q={{ q }}&amp;page={{ button.target }}"{% if button.active %} class="active"{% endif %}>{{ button.label }}</a>
        {% endif %}
    {% endfor %}
</nav>
{% endblock %}"#;

const LIGHTBOX: &str = r#"{% extends "base.html" %}
{% block title %}{{ view.title }}{% endblock %}
{% block return_to %}/photos/{{ view.index }}?q={{ chrome.query | urlencode }}{% endblock %}
{% block content %}
{% set q = chrome.query | urlencode %}
<div id="lightbox">
    <a id="lightbox-close" href="/?q={{ q }}&amp;page={{ close_page }}">&times;</a>
    {% if prev is not none %}
    <a id="lightbox-prev" class="nav" href="/photos/{{ prev }}?q={{ q }}">&#10094;</a>
    {% else %}
    <span class="nav">&#10094;</span>
    {% endif %}
    <div>
        <img id="lightbox-img" class="{{ view.orientation or "landscape" }}" src="{{ view.image_url }}" alt="{{ view.title }}">
        <div id="lightbox-caption">
            <h2>{{ view.title }}</h2>
            <p>{{ view.description }}</p>
            <p>{{ view.meta }}</p>
            <p class="tags" style="justify-content: center;">Tags: {{ view.tags }}</p>
            <p>{{ view.index + 1 }} / {{ view.total }}</p>
            <a href="{{ view.image_url }}" download class="download-btn">⬇️ Download Photo</a>
        </div>
    </div>
    {% if next is not none %}
    <a id="lightbox-next" class="nav" href="/photos/{{ next }}?q={{ q }}">&#10095;</a>
    {% else %}
    <span class="nav">&#10095;</span>
    {% endif %}
</div>
<script>
    document.body.style.overflow = "hidden";
    document.addEventListener("keydown", function (e) {
        var id = { ArrowLeft: "lightbox-prev", ArrowRight: "lightbox-next", Escape: "lightbox-close" }[e.key];
        var link = id && document.getElementById(id);
        if (link) { window.location = link.href; }
    });
    document.getElementById("lightbox").addEventListener("click", function (e) {
        if (e.target.id === "lightbox") { window.location = document.getElementById("lightbox-close").href; }
    });
</script>
{% endblock %}"#;

/// Build the template environment
pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("base.html", BASE)?;
    env.add_template("gallery.html", GALLERY)?;
    env.add_template("lightbox.html", LIGHTBOX)?;
    Ok(env)
}

pub fn render_gallery(env: &Environment<'_>, page: &GalleryPage) -> Result<String> {
    Ok(env.get_template("gallery.html")?.render(page)?)
}

pub fn render_lightbox(env: &Environment<'_>, page: &LightboxPage) -> Result<String> {
    Ok(env.get_template("lightbox.html")?.render(page)?)
}
