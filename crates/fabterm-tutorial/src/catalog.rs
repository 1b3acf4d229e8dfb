//! Tutorial step catalog
//!
//! Static, ordered step definitions. Ids run from 1 to N without gaps. The
//! last step is the terminal step: it declares no expected command and is
//! left by typing [`EXIT_KEYWORD`] or finishing it.

use std::time::Duration;

/// Reserved keyword that leaves the tutorial from the terminal step
pub const EXIT_KEYWORD: &str = "exit";

/// One timed line of an animated output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedLine {
    /// Simulated latency before the line appears
    pub delay: Duration,
    pub content: &'static str,
    /// Signals that the step's output is complete once this line is shown
    pub completes: bool,
}

impl AnimatedLine {
    pub const fn new(delay_ms: u64, content: &'static str) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            content,
            completes: false,
        }
    }

    pub const fn completing(delay_ms: u64, content: &'static str) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            content,
            completes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnimatedOutput {
    pub steps: Vec<AnimatedLine>,
}

impl AnimatedOutput {
    pub fn new(steps: Vec<AnimatedLine>) -> Self {
        Self { steps }
    }

    /// Sum of every declared delay
    pub fn total_delay(&self) -> Duration {
        self.steps.iter().map(|s| s.delay).sum()
    }
}

/// Scripted output of a step
#[derive(Debug, Clone, Copy)]
pub enum MockOutput {
    /// Shown at once as a single block
    Static(&'static str),
    /// Produces a fresh timed sequence each time the step is entered
    Animated(fn() -> AnimatedOutput),
}

#[derive(Debug, Clone, Copy)]
pub struct TutorialStep {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub expected_command: Option<&'static str>,
    pub command_placeholder: Option<&'static str>,
    pub mock_output: MockOutput,
    pub allow_skip: bool,
    pub downloadable_file: Option<&'static str>,
}

/// The DeepFabric tutorial
pub fn catalog() -> &'static [TutorialStep] {
    &STEPS
}

static STEPS: [TutorialStep; 9] = [
    TutorialStep {
        id: 1,
        title: "Welcome to DeepFabric",
        description: "Learn how to generate synthetic training datasets for fine-tuning language models.",
        expected_command: Some("continue"),
        command_placeholder: Some("Type 'continue' or press Ctrl-N..."),
        mock_output: MockOutput::Static(WELCOME),
        allow_skip: false,
        downloadable_file: None,
    },
    TutorialStep {
        id: 2,
        title: "Installation",
        description: "Install DeepFabric using pip.",
        expected_command: Some("pip install deepfabric"),
        command_placeholder: Some("pip install deepfabric"),
        mock_output: MockOutput::Animated(install_output),
        allow_skip: true,
        downloadable_file: None,
    },
    TutorialStep {
        id: 3,
        title: "Basic Generation",
        description: "Generate your first dataset using a configuration file. Download quickstart.yaml to get started.",
        expected_command: Some("deepfabric generate quickstart.yaml"),
        command_placeholder: Some("deepfabric generate quickstart.yaml"),
        mock_output: MockOutput::Animated(generate_output),
        allow_skip: true,
        downloadable_file: Some("quickstart.yaml"),
    },
    TutorialStep {
        id: 4,
        title: "View Generated Dataset",
        description: "Let's examine what was generated.",
        expected_command: Some("cat dataset.jsonl | head -20"),
        command_placeholder: Some("cat dataset.jsonl | head -20"),
        mock_output: MockOutput::Static(DATASET_PREVIEW),
        allow_skip: true,
        downloadable_file: None,
    },
    TutorialStep {
        id: 5,
        title: "Advanced: Tool Calling",
        description: "Generate datasets for training tool-calling agents.",
        expected_command: Some("deepfabric generate agent_tool_calling.yaml"),
        command_placeholder: Some("deepfabric generate agent_tool_calling.yaml"),
        mock_output: MockOutput::Animated(tool_calling_output),
        allow_skip: true,
        downloadable_file: Some("agent_tool_calling.yaml"),
    },
    TutorialStep {
        id: 6,
        title: "View Tool Calling Dataset",
        description: "Examine the generated tool-calling dataset.",
        expected_command: Some("cat tools_dataset.jsonl | head -30"),
        command_placeholder: Some("cat tools_dataset.jsonl | head -30"),
        mock_output: MockOutput::Static(TOOLS_PREVIEW),
        allow_skip: true,
        downloadable_file: None,
    },
    TutorialStep {
        id: 7,
        title: "Upload to Hugging Face",
        description: "Share your dataset with the community.",
        expected_command: Some(
            "deepfabric upload dataset.jsonl --repo username/agent-training-dataset --tags deepfabric synthetic",
        ),
        command_placeholder: Some(
            "deepfabric upload dataset.jsonl --repo username/agent-training-dataset ...",
        ),
        mock_output: MockOutput::Animated(upload_output),
        allow_skip: true,
        downloadable_file: None,
    },
    TutorialStep {
        id: 8,
        title: "Fine-Tune with PEFT/LoRA",
        description: "Use your dataset to fine-tune efficiently using parameter-efficient methods.",
        expected_command: Some(
            "deepfabric format --repo \"username/agent-training-dataset\" -f trl_sft_tools -o dataset.jsonl",
        ),
        command_placeholder: Some(
            "deepfabric format --repo \"username/agent-training-dataset\" -f trl_sft_tools -o dataset.jsonl",
        ),
        mock_output: MockOutput::Animated(fine_tune_output),
        allow_skip: true,
        downloadable_file: None,
    },
    TutorialStep {
        id: 9,
        title: "Tutorial Complete!",
        description: "You've learned the essentials of DeepFabric.",
        expected_command: None,
        command_placeholder: Some("Type 'exit' to return to terminal"),
        mock_output: MockOutput::Static(COMPLETE),
        allow_skip: false,
        downloadable_file: None,
    },
];

const WELCOME: &str = "🚀 Welcome to the DeepFabric Interactive Tutorial!

DeepFabric is a specialized framework for training small language models (SLMs)
to become efficient, capable Agents

In this tutorial, you'll learn:
  ✓ How to install DeepFabric
  ✓ How to generate datasets with the CLI
  ✓ Using configuration files for complex setups
  ✓ Different generation modes and use cases
  ✓ Uploading datasets to Hugging Face Hub
  ✓ Fine-tuning models with PEFT/LoRA

Press Ctrl-N or type 'continue' to begin!";

const DATASET_PREVIEW: &str = r#"{
  "messages": [
    {
      "role": "user",
      "content": "Can you explain Python variables and data types?"
    },
    {
      "role": "assistant",
      "content": "In Python, variables are containers for storing data values. Python has several built-in data types including: integers (int), floating-point numbers (float), strings (str), booleans (bool), lists, dictionaries, and more. Unlike some languages, Python is dynamically typed, meaning you don't need to declare variable types explicitly."
    }
  ]
}
{
  "messages": [
    {
      "role": "user",
      "content": "How do control flow statements work in Python?"
    },
...

✓ Dataset contains 4 Q&A pairs in OpenAI format
✓ Ready for fine-tuning or further processing!"#;

const TOOLS_PREVIEW: &str = r#"{
  "tools": [
    {
      "type": "function",
      "function": {
        "name": "read_file",
        "description": "Read contents of a file",
        "parameters": {
          "type": "object",
          "properties": {
            "path": {"type": "string", "description": "File path"}
          }
        }
      }
    }
  ],
  "messages": [
    {
      "role": "user",
      "content": "Can you check the error logs?"
    },
    {
      "role": "assistant",
      "content": "I'll read the error log file to diagnose the issue.",
      "tool_calls": [
        {
          "id": "call_1",
          "type": "function",
          "function": {
            "name": "read_file",
            "arguments": "{\"path\": \"/var/log/errors.log\"}"
          }
        }
      ]
    }
  ]
}

💡 This format is ready for:
  • TRL SFTTrainer (tool calling fine-tuning)
  • OpenAI-compatible APIs
  • Custom agent training pipelines"#;

const COMPLETE: &str = "🎓 Congratulations! You've completed the DeepFabric tutorial.

What you've learned:
  ✓ Basic CLI dataset generation
  ✓ Using configuration files
  ✓ Advanced templates (tool calling, CoT)
  ✓ Viewing and understanding datasets
  ✓ Uploading to Hugging Face Hub
  ✓ Fine-tuning with your dataset using PEFT/LoRA

Next steps:
  📚 Read the docs: type 'docs' to explore documentation
  💬 Join Discord: Connect with the community https://discord.gg/pPcjYzGvbS
  ⭐ Star us: https://github.com/always-further/deepfabric

Common commands to try:
  • deepfabric info         - Show version and config
  • deepfabric format       - Convert dataset formats
  • deepfabric validate     - Check config files
  • deepfabric visualize    - See topic graphs

Type 'exit' to return to the main terminal.";

const GENERATION_BANNER: &str = "
╭─────────────────────────────────────────────────────────────╮
│ DeepFabric Tree Generation                                  │
│ Building hierarchical topic structure with gpt-4o           │
╰─────────────────────────────────────────────────────────────╯";

const DATASET_BANNER: &str = "
╭─────────────────────────────────────────────────────────────╮
│ DeepFabric Dataset Generation                               │
│ Creating synthetic training data with gpt-4o                │
╰─────────────────────────────────────────────────────────────╯";

fn install_output() -> AnimatedOutput {
    AnimatedOutput::new(vec![
        AnimatedLine::new(500, "Collecting deepfabric"),
        AnimatedLine::new(800, "  Downloading deepfabric-0.1.0-py3-none-any.whl (45 kB)"),
        AnimatedLine::new(600, "Collecting pydantic>=2.0.0"),
        AnimatedLine::new(400, "  Using cached pydantic-2.5.0-py3-none-any.whl (380 kB)"),
        AnimatedLine::new(600, "Collecting openai>=1.0.0"),
        AnimatedLine::new(400, "  Using cached openai-1.6.1-py3-none-any.whl (225 kB)"),
        AnimatedLine::new(600, "Collecting anthropic>=0.8.0"),
        AnimatedLine::new(400, "  Using cached anthropic-0.8.1-py3-none-any.whl (120 kB)"),
        AnimatedLine::new(500, "Installing collected packages: pydantic, openai, anthropic, deepfabric"),
        AnimatedLine::new(800, "✓ Successfully installed deepfabric-0.1.0"),
        AnimatedLine::completing(300, "\n🎉 DeepFabric is ready to use!"),
    ])
}

fn generate_output() -> AnimatedOutput {
    AnimatedOutput::new(vec![
        AnimatedLine::new(300, "✓ Path Validation Passed"),
        AnimatedLine::new(400, "• Expected tree paths: 4 (depth=2, degree=2)"),
        AnimatedLine::new(300, "• Requested samples: 4 (4 steps × 1 batch size)"),
        AnimatedLine::new(300, "• Path utilization: ~100.0%"),
        AnimatedLine::new(800, GENERATION_BANNER),
        AnimatedLine::new(500, "\nConfiguration: depth=2, degree=2"),
        AnimatedLine::new(1000, "\n🌲 Building topic tree (depth 1/2) 0:00:01"),
        AnimatedLine::new(1500, "\nTree building completed successfully"),
        AnimatedLine::new(400, "Generated 4 total paths"),
        AnimatedLine::new(400, "Topic tree saved to deepfabric-topic-tree.jsonl"),
        AnimatedLine::new(300, "Total paths: 4"),
        AnimatedLine::new(800, DATASET_BANNER),
        AnimatedLine::new(500, "\n─────────────────────── Generation Parameters ───────────────────────"),
        AnimatedLine::new(300, "Model:          gpt-4o"),
        AnimatedLine::new(300, "Steps:          4"),
        AnimatedLine::new(300, "Batch Size:     1"),
        AnimatedLine::new(300, "Total Samples:  4"),
        AnimatedLine::new(1000, "\n📝 Generating dataset samples ████████████████████ 4/4 • 4/4 0:01:00 0:00:00"),
        AnimatedLine::new(800, "\nSuccessfully generated 4 samples"),
        AnimatedLine::new(400, "Dataset saved to: training-dataset.jsonl"),
        AnimatedLine::new(600, "\nApplying formatters..."),
        AnimatedLine::new(800, "Formatted dataset saved to dataset.jsonl using trl_sft formatter"),
        AnimatedLine::new(400, "Applied 'trl_sft' formatter: 4 samples"),
        AnimatedLine::completing(300, "\n🎉 Generation complete!"),
    ])
}

fn tool_calling_output() -> AnimatedOutput {
    AnimatedOutput::new(vec![
        AnimatedLine::new(500, "🔧 Generating tool-calling dataset..."),
        AnimatedLine::new(1000, "📋 Template: tool_calling with reasoning traces"),
        AnimatedLine::new(
            1500,
            "\n✓ Generated examples with:\n  • Tool selection reasoning\n  • Parameter construction\n  • Execution traces\n  • Multi-step workflows",
        ),
        AnimatedLine::new(800, "\n✓ Dataset saved to tools_dataset.jsonl (3 entries)"),
        AnimatedLine::completing(300, "🎯 Ready for training agents!"),
    ])
}

fn upload_output() -> AnimatedOutput {
    AnimatedOutput::new(vec![
        AnimatedLine::new(500, "🤗 Uploading to Hugging Face Hub..."),
        AnimatedLine::new(800, "📦 Repository: username/agent-training-dataset"),
        AnimatedLine::new(1000, "\n⬆️  Uploading dataset..."),
        AnimatedLine::new(1500, "  dataset.jsonl ███████████ 100% (2.3 KB)"),
        AnimatedLine::new(1000, "\n📝 Generating dataset card..."),
        AnimatedLine::new(1200, "✓ README.md created with dataset info"),
        AnimatedLine::new(800, "✓ Adding tags: deepfabric, synthetic"),
        AnimatedLine::new(1000, "\n🎉 Upload complete!"),
        AnimatedLine::completing(
            500,
            "🔗 View at: https://huggingface.co/datasets/username/agent-training-dataset",
        ),
    ])
}

fn fine_tune_output() -> AnimatedOutput {
    AnimatedOutput::new(vec![
        AnimatedLine::new(500, "dataset = load_dataset(\"json\", data_files=\"dataset.jsonl\", split=\"train\")"),
        AnimatedLine::new(800, "data/train-00000-of-00001.parquet: 100% 9.66M/9.66M [00:01<00:00, 7.23MB/s]"),
        AnimatedLine::new(1200, "Generating train split: 100% 10050/10050 [00:00<00:00, 98973.13 examples/s]"),
        AnimatedLine::new(1000, "Loaded 10000 samples from username/agent-training-dataset:train"),
        AnimatedLine::new(1500, "Applying formatters..."),
        AnimatedLine::new(1000, "Formatted dataset saved to dataset.jsonl using trl_sft_tools formatter"),
        AnimatedLine::new(1200, "\n🏋️  Training:\n  [Epoch 1/3] ████████░░ Loss: 2.14"),
        AnimatedLine::new(1500, "  [Epoch 2/3] ██████████ Loss: 1.03"),
        AnimatedLine::new(1500, "  [Epoch 3/3] ██████████ Loss: 0.47"),
        AnimatedLine::new(1000, "\n✓ Training complete!"),
        AnimatedLine::new(
            800,
            "\n💾 Saving model:\n  • Adapter weights: ./output/adapter_model.bin (3.2 MB)\n  • Config: ./output/adapter_config.json",
        ),
        AnimatedLine::new(1200, "\n🤗 Pushing to Hugging Face Hub..."),
        AnimatedLine::new(1500, "✓ Model uploaded to: username/agent-finetuned-agent"),
        AnimatedLine::completing(
            500,
            "\n🎉 Fine-tuning complete!\n🔗 https://huggingface.co/username/agent-finetuned-agent",
        ),
    ])
}
