//! Preview sandbox: the isolation boundary for cloned documents.
//!
//! A cloned page is untrusted markup produced from an arbitrary third-party
//! site. It is shown through an `<iframe>` whose `sandbox` attribute is built
//! from an explicit [`SandboxPolicy`] and whose content is passed inline via
//! `srcdoc`, so the document never shares a URL with the host page.
//!
//! With an empty policy the frame runs in a unique opaque origin with scripts
//! disabled. Granting `allow-scripts` together with `allow-same-origin` lets
//! the framed document script against the host's origin, which undoes most of
//! the isolation; [`SandboxPolicy::isolates_origin`] reports that case.

use std::collections::BTreeSet;
use std::fmt;

use cloner_logging::cloner_warn;

/// A single capability token of the iframe `sandbox` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SandboxCapability {
    AllowScripts,
    AllowSameOrigin,
    AllowForms,
    AllowPopups,
    AllowModals,
    AllowDownloads,
    AllowTopNavigation,
}

impl SandboxCapability {
    pub fn token(self) -> &'static str {
        match self {
            SandboxCapability::AllowScripts => "allow-scripts",
            SandboxCapability::AllowSameOrigin => "allow-same-origin",
            SandboxCapability::AllowForms => "allow-forms",
            SandboxCapability::AllowPopups => "allow-popups",
            SandboxCapability::AllowModals => "allow-modals",
            SandboxCapability::AllowDownloads => "allow-downloads",
            SandboxCapability::AllowTopNavigation => "allow-top-navigation",
        }
    }
}

impl fmt::Display for SandboxCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SandboxPolicy {
    capabilities: BTreeSet<SandboxCapability>,
}

impl SandboxPolicy {
    /// No capabilities: opaque origin, no scripts, no forms, no popups.
    pub fn locked() -> Self {
        Self::default()
    }

    /// Scripts plus same-origin, for preview fidelity.
    pub fn preview() -> Self {
        Self::locked()
            .grant(SandboxCapability::AllowScripts)
            .grant(SandboxCapability::AllowSameOrigin)
    }

    pub fn grant(mut self, capability: SandboxCapability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn revoke(mut self, capability: SandboxCapability) -> Self {
        self.capabilities.remove(&capability);
        self
    }

    pub fn allows(&self, capability: SandboxCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn capabilities(&self) -> impl Iterator<Item = SandboxCapability> + '_ {
        self.capabilities.iter().copied()
    }

    /// False when the framed document can run scripts in the host's origin.
    pub fn isolates_origin(&self) -> bool {
        !(self.allows(SandboxCapability::AllowScripts)
            && self.allows(SandboxCapability::AllowSameOrigin))
    }

    /// Value for the `sandbox` attribute. Empty means every restriction applies.
    pub fn attribute_value(&self) -> String {
        self.capabilities()
            .map(SandboxCapability::token)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An iframe element that displays one cloned document under a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame<'a> {
    document: &'a str,
    policy: &'a SandboxPolicy,
    title: &'a str,
}

impl<'a> PreviewFrame<'a> {
    pub fn new(document: &'a str, policy: &'a SandboxPolicy) -> Self {
        Self {
            document,
            policy,
            title: "Cloned page preview",
        }
    }

    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn to_html(&self) -> String {
        if !self.policy.isolates_origin() {
            cloner_warn!(
                "Rendering preview with sandbox \"{}\"; framed scripts share the host origin",
                self.policy.attribute_value()
            );
        }
        format!(
            "<iframe class=\"preview\" title=\"{title}\" sandbox=\"{sandbox}\" referrerpolicy=\"no-referrer\" srcdoc=\"{srcdoc}\"></iframe>",
            title = escape_attribute(self.title),
            sandbox = self.policy.attribute_value(),
            srcdoc = escape_attribute(self.document),
        )
    }
}

pub(crate) fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escapes text for element content.
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
