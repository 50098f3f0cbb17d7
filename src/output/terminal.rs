// Colored terminal output for keywords, topics and provider results.
//
// This module handles all terminal-specific formatting. The main.rs command
// arms delegate here.

use colored::Colorize;

use super::truncate_chars;
use crate::providers::traits::{Article, ArticleSummary, Entity, Sentiment};
use crate::topics::TopicRecord;

/// Display a ranked keyword list.
pub fn display_keywords(keywords: &[String]) {
    if keywords.is_empty() {
        println!("No keywords found (text may be empty or all stop words).");
        return;
    }

    println!("\n{}", format!("=== Keywords ({}) ===", keywords.len()).bold());
    for (i, keyword) in keywords.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, keyword.cyan());
    }
    println!();
}

/// Display topic records, one line per topic.
pub fn display_topics(topics: &[TopicRecord], article_count: usize) {
    println!(
        "\n{}",
        format!(
            "=== {} Topics (from {} articles) ===",
            topics.len(),
            article_count
        )
        .bold()
    );
    println!();

    for topic in topics {
        let keywords = if topic.keywords.is_empty() {
            "(no articles in this topic)".dimmed().to_string()
        } else {
            topic.keywords.join(", ")
        };
        println!("  {:<10} {}", topic.label.green().bold(), keywords);
    }
    println!();
}

pub fn display_article(article: &Article) {
    println!("\n{}", article.headline.bold());
    println!();
    println!("{}", article.body);
    println!();
}

/// Display search hits with source and a short description.
pub fn display_search_results(query: &str, articles: &[ArticleSummary]) {
    if articles.is_empty() {
        println!("No articles found for \"{query}\".");
        return;
    }

    println!(
        "\n{}",
        format!("=== {} articles for \"{query}\" ===", articles.len()).bold()
    );
    println!();

    for (i, article) in articles.iter().enumerate() {
        let title = article.title.as_deref().unwrap_or("(untitled)");
        let source = article.source.as_deref().unwrap_or("unknown source");
        println!("  {:>3}. {} {}", i + 1, title.bold(), format!("({source})").dimmed());
        if let Some(ref description) = article.description {
            println!("       {}", truncate_chars(description, 120));
        }
        println!("       {}", article.url.blue().underline());
    }
    println!();
}

pub fn display_sentiment(labels: &[Sentiment]) {
    if labels.is_empty() {
        println!("No sentiment labels returned.");
        return;
    }
    for label in labels {
        let name = match label.label.to_ascii_uppercase().as_str() {
            "POSITIVE" => label.label.green().bold(),
            "NEGATIVE" => label.label.red().bold(),
            _ => label.label.yellow().bold(),
        };
        println!("  {:<10} {:.3}", name, label.score);
    }
}

pub fn display_entities(entities: &[Entity]) {
    if entities.is_empty() {
        println!("No named entities found.");
        return;
    }

    println!(
        "  {:<6} {:<32} {:>6}",
        "Type".dimmed(),
        "Text".dimmed(),
        "Score".dimmed()
    );
    println!("  {}", "-".repeat(46).dimmed());
    for entity in entities {
        println!(
            "  {:<6} {:<32} {:>6.3}",
            entity.entity_group.magenta(),
            truncate_chars(&entity.word, 30),
            entity.score
        );
    }
}
