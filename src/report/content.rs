//! Compiled-in report content.
//!
//! Everything here is presentation data: the viewer renders it as given and
//! attaches no behavior to it beyond section navigation.

use serde::Serialize;

use crate::nav::Section;

/// Navigable sections in declaration order.
pub const SECTIONS: [Section; 5] = [
    Section::new("philosophy", "Philosophy"),
    Section::new("physics", "Physics"),
    Section::new("logic", "Logic"),
    Section::new("aesthetics", "Aesthetics"),
    Section::new("references", "References"),
];

/// Total end-to-end latency budget drawn as the chart's reference line.
pub const LATENCY_THRESHOLD_MS: u32 = 30;

/// Upper bound of the chart's latency axis.
pub const LATENCY_AXIS_MAX_MS: u32 = 40;

/// One stage of the motion-to-photon pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencyStage {
    pub phase: &'static str,
    pub function: &'static str,
    pub latency_ms: u32,
    pub description: &'static str,
    /// Bar color as `#rrggbb`.
    pub color: &'static str,
}

/// A guiding principle card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Principle {
    pub title: &'static str,
    pub body: &'static str,
}

/// A short note under the latency chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineNote {
    pub title: &'static str,
    pub body: &'static str,
}

/// One layer of the persona-fidelity architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchitectureModule {
    pub number: u8,
    pub name: &'static str,
    pub stack: &'static str,
    pub summary: &'static str,
    /// Marks the layer acting as the checker in the maker-checker pair.
    pub checker: bool,
}

/// A row of the synesthesia table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmotionMapping {
    pub state: &'static str,
    pub visual: &'static str,
    pub auditory: &'static str,
    pub behavior: &'static str,
}

/// A cited source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TechReference {
    pub id: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub summary: &'static str,
}

/// Document-level metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    pub project: &'static str,
    pub version: &'static str,
    pub title: &'static str,
    pub classification: &'static str,
    pub tenet: &'static str,
    pub status: &'static str,
    pub copyright: &'static str,
    pub clearance: &'static str,
}

/// The complete report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub sections: Vec<Section>,
    pub principles: Vec<Principle>,
    pub latency_intro: &'static str,
    pub latency_budget: Vec<LatencyStage>,
    pub latency_threshold_ms: u32,
    pub pipeline_notes: Vec<PipelineNote>,
    pub modules: Vec<ArchitectureModule>,
    pub emotions: Vec<EmotionMapping>,
    pub references: Vec<TechReference>,
}

impl Report {
    /// Section headings, indexed like [`SECTIONS`].
    pub const HEADINGS: [&'static str; 5] = [
        "1. Functional Blueprint: A First-Principles Architecture",
        "2. Physics First Principles: End-to-End Latency Constraints",
        "3. Logic Architecture: Persona Fidelity (Maker-Checker)",
        "4. Interaction Aesthetics: Synesthesia",
        "Appendix: Core Technical References",
    ];

    /// Build the Polaris immersive-mode design report.
    #[must_use]
    pub fn polaris() -> Self {
        Self {
            meta: ReportMeta {
                project: "PROJECT POLARIS",
                version: "V2.0",
                title: "Dialogue Polaris \"Immersive Mode\" In-Depth Design Report",
                classification: "Classification: Top Secret / Core Architecture",
                tenet: "Core tenet: Intellectual Fidelity",
                status: "System Status: Nominal",
                copyright: "(c) 2025 Project Polaris Architecture Team. All rights reserved.",
                clearance: "Authorized Personnel Only. Class A-1 Security Clearance Required.",
            },
            sections: SECTIONS.to_vec(),
            principles: vec![
                Principle {
                    title: "Intellectual Fidelity",
                    body: "The first principle of the system. The knowledge and philosophical \
                           stance of each virtual figure must stay accurate in its historical and \
                           academic context. Rejects the averaged LLM persona in favour of \
                           constraints built on the Big-Five (OCEAN) model.",
                },
                Principle {
                    title: "Anti-Dependency",
                    body: "The AI is not an omniscient oracle but a Socratic guide. Gap prompts \
                           expose holes in the user's reasoning and chain-of-thought is made \
                           visible to earn trust.",
                },
            ],
            latency_intro: "Immersion is physically a matter of controlling Motion-to-Photon \
                            (MTP) latency. To prevent motion sickness a total budget of <30ms \
                            is enforced.",
            latency_budget: vec![
                LatencyStage {
                    phase: "L1",
                    function: "Sensor input",
                    latency_ms: 3,
                    description: "FPGA preprocessing (IMU/Audio)",
                    color: "#94a3b8",
                },
                LatencyStage {
                    phase: "L2",
                    function: "Network transport",
                    latency_ms: 5,
                    description: "5G URLLC / QUIC",
                    color: "#22d3ee",
                },
                LatencyStage {
                    phase: "L3-A",
                    function: "Intuitive reaction (Sys 1)",
                    latency_ms: 8,
                    description: "Pre-emptive perception / non-verbal cues",
                    color: "#facc15",
                },
                LatencyStage {
                    phase: "L4",
                    function: "Predictive rendering",
                    latency_ms: 9,
                    description: "Visual Pre-emption / 3DGS",
                    color: "#c084fc",
                },
                LatencyStage {
                    phase: "L5",
                    function: "Display",
                    latency_ms: 5,
                    description: "ATW compensation",
                    color: "#94a3b8",
                },
            ],
            latency_threshold_ms: LATENCY_THRESHOLD_MS,
            pipeline_notes: vec![
                PipelineNote {
                    title: "L2: QUIC",
                    body: "Avoids TCP head-of-line blocking and keeps transport stable over 5G.",
                },
                PipelineNote {
                    title: "L3/4: Parallel pipeline",
                    body: "Speculative sampling drafts a reply while 3DGS rendering starts, \
                           breaking the serial bottleneck.",
                },
                PipelineNote {
                    title: "L5: ATW compensation",
                    body: "Asynchronous time warp corrects dropped frames from head motion at \
                           the final display stage.",
                },
            ],
            modules: vec![
                ArchitectureModule {
                    number: 1,
                    name: "Knowledge retrieval",
                    stack: "GraphRAG + vector database",
                    summary: "Accesses historical facts and multi-hop cross-domain reasoning \
                              to keep context accurate.",
                    checker: false,
                },
                ArchitectureModule {
                    number: 2,
                    name: "Persona style",
                    stack: "Style Transfer + ICL",
                    summary: "Locks the figure's rhetoric, vocabulary, pace and verbal tics.",
                    checker: false,
                },
                ArchitectureModule {
                    number: 3,
                    name: "Constraint adherence",
                    stack: "Constitutional AI + DPO",
                    summary: "Reviews ethics, historical setting and philosophical \
                              consistency to prevent hallucination.",
                    checker: true,
                },
                ArchitectureModule {
                    number: 4,
                    name: "Anti-dependency",
                    stack: "Socratic Prompting",
                    summary: "Spots logical gaps and asks guiding questions that provoke \
                              critical thinking.",
                    checker: false,
                },
            ],
            emotions: vec![
                EmotionMapping {
                    state: "Contemplation / deep logic",
                    visual: "Low saturation, cool tones, balanced geometry",
                    auditory: "Alpha-band low tones, very slow BPM",
                    behavior: "Fewer blinks, sustained eye contact",
                },
                EmotionMapping {
                    state: "Confusion / cognitive conflict",
                    visual: "High-contrast texture, non-linear lighting",
                    auditory: "Dissonant intervals, rising emphasis",
                    behavior: "Slight brow raise (AU1+2), head tilt",
                },
                EmotionMapping {
                    state: "Excitement / grand narrative",
                    visual: "Saturated warm tones, faster particle flow",
                    auditory: "Orchestral scoring, panoramic spatial audio",
                    behavior: "Dilated pupils, faster speech",
                },
            ],
            references: vec![
                TechReference {
                    id: "[1]",
                    title: "Simulating Historical Figures",
                    source: "ResearchGate (2025)",
                    summary: "Knowledge fidelity patterns in LLMs.",
                },
                TechReference {
                    id: "[11]",
                    title: "The Cognitive Mirror",
                    source: "Frontiers in Education (2025)",
                    summary: "Framework for AI metacognition.",
                },
                TechReference {
                    id: "[14]",
                    title: "Latency Perception Thresholds",
                    source: "IEEE Computer Society",
                    summary: "Behavioral evidence for <30ms constraints.",
                },
                TechReference {
                    id: "[23]",
                    title: "FastVideoEdit: Consistency Models",
                    source: "IEEE Xplore",
                    summary: "Consistency models for efficient generation.",
                },
                TechReference {
                    id: "[48]",
                    title: "Step-by-Step Mastery (DPO)",
                    source: "arXiv (2025)",
                    summary: "Enhancing soft constraint following.",
                },
                TechReference {
                    id: "[67]",
                    title: "Virtual Skin & Synesthesia",
                    source: "OAPEN Library",
                    summary: "Co-creating 3D materials with AI.",
                },
            ],
        }
    }

    /// Sum of all stage latencies.
    #[must_use]
    pub fn total_latency_ms(&self) -> u32 {
        self.latency_budget.iter().map(|s| s.latency_ms).sum()
    }

    /// Heading of a section by id.
    #[must_use]
    pub fn heading(&self, id: &str) -> Option<&'static str> {
        SECTIONS
            .iter()
            .position(|s| s.id == id)
            .map(|i| Self::HEADINGS[i])
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::polaris()
    }
}
