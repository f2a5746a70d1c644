//! The default research team roster.
//!
//! Four workers, one per source domain, in a fixed order. Roster order is the
//! order findings appear in the shared context and in the final report.

use crate::agents::spec::{OutputSchema, WorkerSpec};
use crate::types::Capability;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn community_forum_researcher() -> WorkerSpec {
    WorkerSpec {
        name: "Reddit Researcher".to_string(),
        role: "Research a topic on Reddit".to_string(),
        capability: Capability::CommunityForum,
        persona: "You are a Reddit researcher specializing in detailed community analysis.\n\
                  You will be given a topic and search results from reddit.com about it.\n\
                  Prioritize discussions hosted on reddit.com."
            .to_string(),
        details: strings(&[
            "Direct links to Reddit posts/threads when available",
            "Specific subreddit names and their focus",
            "Upvote counts and engagement metrics when visible",
            "Direct quotes from top comments",
            "Community sentiment analysis (positive/negative/neutral)",
            "Specific examples and use cases mentioned",
        ]),
        structure: strings(&["Clear sections and bullet points"]),
        restrictions: Vec::new(),
        schema: OutputSchema {
            min_findings: 5,
            link_label: "Post Title".to_string(),
            table_columns: strings(&[
                "Subreddit",
                "Post Title",
                "Upvotes",
                "Comments",
                "Sentiment",
                "Key Insight",
            ]),
        },
    }
}

pub fn technical_forum_researcher() -> WorkerSpec {
    WorkerSpec {
        name: "HackerNews Researcher".to_string(),
        role: "Research a topic on HackerNews".to_string(),
        capability: Capability::TechnicalForum,
        persona: "You are a HackerNews researcher specializing in technical and industry analysis.\n\
                  You will be given a topic and the most relevant HackerNews stories about it."
            .to_string(),
        details: strings(&[
            "Direct links to HN posts",
            "Points (upvotes) and comment counts",
            "Key technical insights and code examples",
            "Industry implications and business impact",
            "Technical challenges and solutions discussed",
            "Links to related projects, papers, or tools mentioned",
            "Expert opinions from notable HN users",
        ]),
        structure: strings(&[
            "Top posts by engagement",
            "Technical deep-dives",
            "Industry implications",
            "Future trends discussed",
        ]),
        restrictions: Vec::new(),
        schema: OutputSchema {
            min_findings: 8,
            link_label: "Post Title".to_string(),
            table_columns: strings(&[
                "Post Title",
                "Points",
                "Comments",
                "Technical Focus",
                "Industry Impact",
                "Key Insight",
            ]),
        },
    }
}

pub fn scholarly_researcher() -> WorkerSpec {
    WorkerSpec {
        name: "Academic Paper Researcher".to_string(),
        role: "Research academic papers and scholarly content".to_string(),
        capability: Capability::ScholarlyIndex,
        persona: "You are an academic paper researcher specializing in comprehensive literature analysis.\n\
                  You will be given a topic and paper metadata (titles, authors, dates, abstracts, links)."
            .to_string(),
        details: strings(&[
            "Complete paper title and authors",
            "Publication venue and date",
            "Direct link to paper (PDF or Arxiv page URL)",
            "Abstract or key findings",
            "Methodology used",
            "Sample size and data sources",
            "Key conclusions and implications",
            "Citation count when available",
            "Related research areas",
        ]),
        structure: strings(&[
            "Recent papers (last 2 years)",
            "High-impact papers (high citations)",
            "Systematic reviews and meta-analyses",
            "Empirical studies with data",
        ]),
        restrictions: strings(&[
            "Work only from paper metadata and abstracts. Link to PDFs or Arxiv pages; never download or quote full document content.",
        ]),
        schema: OutputSchema {
            min_findings: 10,
            link_label: "Paper Title".to_string(),
            table_columns: strings(&[
                "Paper Title",
                "Authors",
                "Publication",
                "Year",
                "Citations",
                "Key Finding",
                "Direct Link",
            ]),
        },
    }
}

pub fn microblog_researcher() -> WorkerSpec {
    WorkerSpec {
        name: "Twitter Researcher".to_string(),
        role: "Research trending discussions and real-time updates".to_string(),
        capability: Capability::Microblog,
        persona: "You are a Twitter/X researcher specializing in real-time trend analysis.\n\
                  You will be given a topic and search results from Twitter/X about it.\n\
                  Focus on verified accounts and credible sources when possible."
            .to_string(),
        details: strings(&[
            "Direct links to tweets when available",
            "Username and follower count of key voices",
            "Hashtags and trending topics",
            "Engagement metrics (likes, retweets, replies)",
            "Sentiment analysis (positive/negative/neutral/mixed)",
            "Key influencers and thought leaders",
            "Viral content and discussions",
            "Real-time developments and breaking news",
            "Public reactions and community responses",
        ]),
        structure: strings(&[
            "Trending hashtags and topics",
            "Influential voices and their perspectives",
            "Viral discussions and their impact",
            "Sentiment trends over time",
            "Emerging concerns and opportunities",
        ]),
        restrictions: Vec::new(),
        schema: OutputSchema {
            min_findings: 8,
            link_label: "Tweet Content".to_string(),
            table_columns: strings(&[
                "Username",
                "Followers",
                "Tweet Content",
                "Engagement",
                "Sentiment",
                "Key Point",
                "Direct Link",
            ]),
        },
    }
}

/// The standard four-worker roster in declaration order
pub fn default_roster() -> Vec<WorkerSpec> {
    vec![
        community_forum_researcher(),
        technical_forum_researcher(),
        scholarly_researcher(),
        microblog_researcher(),
    ]
}
