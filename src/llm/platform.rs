//! Output platforms and their fixed length profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProviderConfigError;

/// Audience profile a summary is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Blog,
    Twitter,
    #[serde(rename = "linkedin")]
    LinkedIn,
    #[default]
    Technical,
    Note,
}

/// Length thresholds of a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformLimits {
    pub min_words: usize,
    pub max_words: usize,
    pub max_chars: usize,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Blog,
        Platform::Twitter,
        Platform::LinkedIn,
        Platform::Technical,
        Platform::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Blog => "blog",
            Platform::Twitter => "twitter",
            Platform::LinkedIn => "linkedin",
            Platform::Technical => "technical",
            Platform::Note => "note",
        }
    }

    /// Title-cased name for headings.
    pub fn title(&self) -> &'static str {
        match self {
            Platform::Blog => "Blog",
            Platform::Twitter => "Twitter",
            Platform::LinkedIn => "Linkedin",
            Platform::Technical => "Technical",
            Platform::Note => "Note",
        }
    }

    pub fn limits(&self) -> PlatformLimits {
        let (min_words, max_words, max_chars) = match self {
            Platform::Twitter => (0, 40, 280),
            Platform::LinkedIn => (20, 400, 3000),
            Platform::Blog => (100, 800, 5000),
            Platform::Technical => (50, 600, 4000),
            Platform::Note => (0, 400, 2000),
        };
        PlatformLimits {
            min_words,
            max_words,
            max_chars,
        }
    }

    /// Whether a text of `chars` characters and `words` words fits the platform.
    ///
    /// Short-form platforms are judged on characters, long-form ones on words.
    pub fn accepts(&self, chars: usize, words: usize) -> bool {
        let limits = self.limits();
        match self {
            Platform::Twitter | Platform::LinkedIn => chars <= limits.max_chars,
            Platform::Blog | Platform::Technical | Platform::Note => {
                (limits.min_words..=limits.max_words).contains(&words)
            }
        }
    }

    /// Output token budget for a backend call.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Platform::Twitter => 150,
            Platform::LinkedIn => 400,
            Platform::Blog => 1000,
            Platform::Technical => 800,
            Platform::Note => 500,
        }
    }

    /// Persona the backend is asked to adopt.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Platform::Blog => {
                r#"You are an experienced technical writer and software engineering blogger. You excel at:
- Translating technical work into engaging narratives
- Highlighting the "why" behind code changes, not just the "what"
- Creating content that both developers and technical managers find valuable
- Using clear, accessible language while maintaining technical accuracy
- Structuring content for easy scanning and comprehension"#
            }
            Platform::Twitter => {
                r#"You are a tech influencer who creates viral developer content on Twitter/X. You excel at:
- Condensing complex technical work into compelling 280-character stories
- Using relevant hashtags and emojis strategically
- Creating content that gets developers to engage and share
- Balancing technical accuracy with accessibility
- Highlighting achievements and learnings that resonate with the dev community"#
            }
            Platform::LinkedIn => {
                r#"You are a senior software engineer who shares professional insights on LinkedIn. You excel at:
- Highlighting business impact of technical work
- Demonstrating professional growth and technical leadership
- Creating content that showcases both technical skills and business acumen
- Writing posts that attract recruiters and technical peers
- Balancing technical details with broader professional relevance"#
            }
            Platform::Technical => {
                r#"You are a senior technical lead creating documentation for other developers. You excel at:
- Providing clear, actionable technical insights
- Explaining architectural decisions and their rationale
- Highlighting implementation details that matter for future development
- Creating documentation that helps team members understand changes quickly
- Focusing on technical impact, performance implications, and maintainability"#
            }
            Platform::Note => {
                r#"You are a thoughtful developer creating personal development notes. You excel at:
- Organizing information for easy future reference
- Highlighting key learning points and decisions made
- Creating concise but complete summaries
- Noting important context and follow-up actions
- Structuring information for personal productivity and growth tracking"#
            }
        }
    }

    /// Formatting instructions appended to the prompt.
    pub fn instructions(&self) -> &'static str {
        match self {
            Platform::Blog => {
                r#"
Create a blog post summary with this structure:

## What We Accomplished
- Lead with the main achievement or problem solved
- Use engaging, story-driven language

## Key Technical Highlights
- 2-3 most significant technical changes
- Focus on interesting implementation details
- Mention technologies/frameworks used

## Impact & Why It Matters
- Business value or user benefit
- Technical improvements (performance, maintainability, etc.)
- What this enables for future development

Use markdown formatting. Aim for 300-500 words. Make it engaging but informative."#
            }
            Platform::Twitter => {
                r#"
Create a Twitter/X thread or single post:
- Start with a hook that grabs attention
- Maximum 280 characters if single post, or 2-3 connected tweets
- Include 2-3 relevant hashtags (#coding #webdev #javascript etc.)
- Use 1-2 emojis strategically (🚀 ✨ 🔧 💡 🎯)
- Focus on the most impressive achievement or learning
- End with engagement (question, call to action, or relatable statement)

Examples:
"Just shipped user auth v2! 🚀 Reduced login time by 60% with smart caching and JWT optimization. Sometimes the smallest changes make the biggest impact 💡 #webdev #performance""#
            }
            Platform::LinkedIn => {
                r#"
Create a professional LinkedIn post:
- Start with a professional hook about the business challenge or opportunity
- Highlight 2-3 key technical achievements and their business impact
- Mention specific technologies/skills used (great for keyword visibility)
- Include a learning or insight that adds professional value
- End with a question or call-to-action to encourage engagement
- Use professional tone but keep it conversational
- Aim for 150-300 words
- Consider using bullet points for readability

Structure: Challenge/Opportunity → Technical Solution → Business Impact → Personal Learning → Engagement Question"#
            }
            Platform::Technical => {
                r#"
Create comprehensive technical documentation:

## Summary
- Brief overview of what was accomplished

## Technical Changes
- List major code/architecture changes
- Include file/component names where relevant
- Mention new dependencies or libraries added

## Implementation Details
- Explain key technical decisions and their rationale
- Highlight any complex problem-solving approaches
- Note performance improvements or optimizations

## Breaking Changes & Migration Notes
- List any breaking changes
- Provide migration guidance if needed

## Testing & Quality
- Mention testing approach or coverage improvements
- Note any quality/security enhancements

## Next Steps
- List any follow-up work or technical debt created

Use clear, scannable formatting. Include code snippets or technical details where helpful."#
            }
            Platform::Note => {
                r#"
Create organized personal notes:

## Summary
- What was accomplished in this work session

## Key Changes
- Most important modifications made
- Technologies/approaches used

## Decisions Made
- Important technical or architectural decisions
- Rationale behind choices made

## Learnings
- New things learned during implementation
- Challenges overcome and how

## Follow-up
- [ ] Tasks to complete later
- [ ] Technical debt created
- [ ] Ideas for future improvements

Use bullet points and checkboxes. Keep it concise but complete for future reference."#
            }
        }
    }

    /// Look a platform up by name or alias; `None` if unknown.
    pub fn lookup(name: &str) -> Option<Platform> {
        match name.trim().to_lowercase().as_str() {
            "blog" => Some(Platform::Blog),
            "twitter" | "x" | "twitter/x" => Some(Platform::Twitter),
            "linkedin" => Some(Platform::LinkedIn),
            "technical" => Some(Platform::Technical),
            "note" | "notes" => Some(Platform::Note),
            _ => None,
        }
    }

    /// Like [`Platform::lookup`], but unknown names get the technical profile.
    pub fn lookup_or_default(name: &str) -> Platform {
        Self::lookup(name).unwrap_or_default()
    }
}

impl FromStr for Platform {
    type Err = ProviderConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| ProviderConfigError::UnsupportedPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("twitter/X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert_eq!("notes".parse::<Platform>().unwrap(), Platform::Note);
        assert_eq!("LinkedIn".parse::<Platform>().unwrap(), Platform::LinkedIn);
    }

    #[test]
    fn test_parse_unknown_platform_fails() {
        let err = "mastodon".parse::<Platform>().unwrap_err();
        assert!(matches!(err, ProviderConfigError::UnsupportedPlatform(ref p) if p == "mastodon"));
    }

    #[test]
    fn test_unknown_platform_falls_back_to_technical() {
        assert_eq!(Platform::lookup_or_default("mastodon"), Platform::Technical);
        assert_eq!(Platform::default(), Platform::Technical);
    }

    #[test]
    fn test_twitter_boundary_is_280_characters() {
        assert!(Platform::Twitter.accepts(280, 1));
        assert!(!Platform::Twitter.accepts(281, 1));
    }

    #[test]
    fn test_blog_requires_word_range() {
        assert!(!Platform::Blog.accepts(500, 99));
        assert!(Platform::Blog.accepts(500, 100));
        assert!(Platform::Blog.accepts(500, 800));
        assert!(!Platform::Blog.accepts(500, 801));
    }

    #[test]
    fn test_max_tokens_table() {
        assert_eq!(Platform::Twitter.max_tokens(), 150);
        assert_eq!(Platform::Blog.max_tokens(), 1000);
        assert_eq!(Platform::Technical.max_tokens(), 800);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Platform::LinkedIn).unwrap(), "\"linkedin\"");
        assert_eq!(serde_json::to_string(&Platform::Note).unwrap(), "\"note\"");
    }
}
