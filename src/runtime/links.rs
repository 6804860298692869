use crate::foundation::error::{PagewrightError, PagewrightResult};

/// Informational text shown instead of following a link.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDescriptor {
    pub match_key: String,
    pub title: String,
    pub body: String,
}

impl LinkDescriptor {
    pub fn new(
        match_key: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            match_key: match_key.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn fallback() -> Self {
        Self::new(
            "",
            "External Link",
            "This link would take you to an external page. In this training, links are disabled \
             to keep you focused on learning the portal navigation.",
        )
    }
}

/// How a clicked target is compared against descriptor keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMatch {
    /// Equality after [`normalize_url`].
    #[default]
    Normalized,
    /// Key contains target or target contains key; first entry wins.
    Containment,
}

impl LinkMatch {
    pub fn matches(self, key: &str, target: &str) -> bool {
        if key.is_empty() || target.is_empty() {
            return false;
        }
        match self {
            Self::Normalized => normalize_url(key) == normalize_url(target),
            Self::Containment => target.contains(key) || key.contains(target),
        }
    }
}

/// Drop scheme, query, fragment and trailing slashes; lowercase the host.
///
/// `https://Sam.gov/content/home/?x=1` and `sam.gov/content/home` normalize the same.
pub fn normalize_url(url: &str) -> String {
    let s = url.trim();
    let s = match s.find("://") {
        Some(i) if s[..i].chars().all(|c| c.is_ascii_alphanumeric() || "+.-".contains(c)) => {
            &s[i + 3..]
        }
        _ => s.strip_prefix("//").unwrap_or(s),
    };
    let s = s.split(['?', '#']).next().unwrap_or_default();
    let (host, path) = match s.find('/') {
        Some(i) => s.split_at(i),
        None => (s, ""),
    };
    let mut out = host.to_ascii_lowercase();
    out.push_str(path.trim_end_matches('/'));
    out
}

/// Links that keep their default behavior: in-page fragments, empty targets and `javascript:`.
pub fn is_interceptable(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty()
        || href.starts_with('#')
        || href.to_ascii_lowercase().starts_with("javascript:"))
}

/// Insertion-ordered descriptor table with a generic fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkTable {
    entries: Vec<LinkDescriptor>,
    fallback: LinkDescriptor,
}

impl LinkTable {
    pub fn new(entries: Vec<LinkDescriptor>) -> PagewrightResult<Self> {
        for (i, e) in entries.iter().enumerate() {
            if e.match_key.trim().is_empty() {
                return Err(PagewrightError::validation(format!(
                    "link descriptor '{}' has an empty key",
                    e.title
                )));
            }
            if entries[..i].iter().any(|prev| prev.match_key == e.match_key) {
                return Err(PagewrightError::validation(format!(
                    "duplicate link key '{}'",
                    e.match_key
                )));
            }
        }
        Ok(Self {
            entries,
            fallback: LinkDescriptor::fallback(),
        })
    }

    pub fn with_fallback(mut self, fallback: LinkDescriptor) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn entries(&self) -> &[LinkDescriptor] {
        &self.entries
    }

    pub fn fallback(&self) -> &LinkDescriptor {
        &self.fallback
    }

    pub fn lookup(&self, target: &str, policy: LinkMatch) -> Option<&LinkDescriptor> {
        self.entries
            .iter()
            .find(|e| policy.matches(&e.match_key, target))
    }

    pub fn resolve(&self, target: &str, policy: LinkMatch) -> &LinkDescriptor {
        self.lookup(target, policy).unwrap_or(&self.fallback)
    }

    /// Program resource pages referenced from the training page.
    pub fn training_resources() -> Self {
        let d = LinkDescriptor::new;
        let entries = vec![
            d(
                "https://business.defense.gov/Programs/Mentor-Protege-Program/MPP-Resources/",
                "MPP Resources",
                "This page provides official program materials including the Mentor-Protege \
                 Program Portal link, the approved mentor list PDF, key regulations (DFARS, \
                 10 USC 4902), and contact information for program questions.",
            ),
            d(
                "https://sam.gov/content/home",
                "SAM.gov Registration",
                "SAM.gov is the official U.S. Government system for federal contracting. Here \
                 you can register your business, obtain a Unique Entity ID, and access contract \
                 opportunities required for DoD program participation.",
            ),
            d(
                "https://business.defense.gov/Programs/Mentor-Protege-Program/How-to-Participate/",
                "How to Participate",
                "This page outlines the seven-step process for joining the MPP, from finding a \
                 mentor or protege partner, choosing between credit or reimbursed agreements, to \
                 submitting applications and meeting reporting requirements.",
            ),
            d(
                "https://business.defense.gov/Programs/Mentor-Protege-Program/Protege-Eligibility-Requirements/",
                "Eligibility Requirements",
                "This page details qualification criteria for both mentors (active subcontracting \
                 plan, $25M+ DoD contracts) and proteges (SDB, WOSB, SDVOSB, HUBZone, or \
                 organizations employing the severely disabled).",
            ),
            d(
                "https://dev-mpp.eccalon.com/mppdev/assets/DoD_Approved_Mentor_List_080624-vnKFkIOs.pdf",
                "Approved Mentor List",
                "This PDF contains the official list of DoD-approved mentor companies that are \
                 authorized to participate in the Mentor-Protege Program and can partner with \
                 eligible small businesses.",
            ),
            d(
                "https://business.defense.gov/Programs/Mentor-Prot%C3%A9g%C3%A9-Program/Regulation-Legislation/",
                "Why We Have MPP",
                "This page explains the Mentor-Protege Program's history as the oldest federal \
                 mentor-protege program, its mission to help small businesses enter the defense \
                 industrial base, and how successful agreements benefit all parties.",
            ),
            d(
                "https://business.defense.gov/Programs/Mentor-Protege-Program/Contacts/",
                "DoD OSBP Contacts",
                "This page provides contact information for the MPP Director, Associate \
                 Director, and program managers at each military branch and defense agency \
                 including Army, Navy, Air Force, DCMA, DLA, and others.",
            ),
            d(
                "https://business.defense.gov/Programs/Mentor-Protege-Program/FAQs/",
                "Frequently Asked Questions",
                "This page answers common questions about program requirements, eligibility \
                 criteria, agreement types, finding mentors, cost reimbursement, reporting \
                 obligations, and includes a helpful acronym reference table.",
            ),
            d(
                "https://dodcio.defense.gov/DoD-Web-Policy/",
                "DoD Web Policy",
                "This page contains DoD policies governing official websites and social media, \
                 including security requirements, privacy guidelines, accessibility standards \
                 (Section 508), and applicable federal legislation.",
            ),
            d(
                "https://business.defense.gov/Programs/Mentor-Prot%C3%A9g%C3%A9-Program/Contacts/",
                "Contact Us",
                "This page provides contact information for the MPP Director, Associate \
                 Director, and program managers at each military branch and defense agency.",
            ),
        ];
        Self {
            entries,
            fallback: LinkDescriptor::fallback(),
        }
    }
}

/// Fixed presentation options passed to the dialog library.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogStyle {
    pub icon: String,
    pub confirm_button_text: String,
    pub confirm_button_color: String,
    pub width: String,
}

impl Default for DialogStyle {
    fn default() -> Self {
        Self {
            icon: "info".to_string(),
            confirm_button_text: "Got it!".to_string(),
            confirm_button_color: "#243d80".to_string(),
            width: "600px".to_string(),
        }
    }
}

/// Argument object of one dialog call.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogRequest {
    pub title: String,
    pub html: String,
    pub icon: String,
    pub confirm_button_text: String,
    pub confirm_button_color: String,
    pub width: String,
}

/// Replaces navigation with an explanatory dialog.
#[derive(Clone, Debug)]
pub struct LinkInterceptor {
    table: LinkTable,
    policy: LinkMatch,
    style: DialogStyle,
}

impl LinkInterceptor {
    pub fn new(table: LinkTable, policy: LinkMatch) -> Self {
        Self {
            table,
            policy,
            style: DialogStyle::default(),
        }
    }

    pub fn with_style(mut self, style: DialogStyle) -> Self {
        self.style = style;
        self
    }

    pub fn table(&self) -> &LinkTable {
        &self.table
    }

    pub fn policy(&self) -> LinkMatch {
        self.policy
    }

    pub fn style(&self) -> &DialogStyle {
        &self.style
    }

    /// Dialog to show for a click on `href`, or `None` when the link keeps its default behavior.
    pub fn on_click(&self, href: &str) -> Option<DialogRequest> {
        is_interceptable(href).then(|| self.dialog_for(href))
    }

    pub fn dialog_for(&self, href: &str) -> DialogRequest {
        let info = self.table.resolve(href, self.policy);
        let html = format!(
            "<p style=\"font-size: 16px; line-height: 1.6;\">{}</p>\n\
             <p style=\"font-size: 14px; color: #666; margin-top: 15px;\">\n  \
             <em>In the live portal, this link would open: {}</em>\n</p>",
            escape_html(&info.body),
            escape_html(href)
        );
        DialogRequest {
            title: info.title.clone(),
            html,
            icon: self.style.icon.clone(),
            confirm_button_text: self.style.confirm_button_text.clone(),
            confirm_button_color: self.style.confirm_button_color.clone(),
            width: self.style.width.clone(),
        }
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
