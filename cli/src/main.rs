use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cursus::model::entity::{ContentKind, LessonContent, LessonDraft, ModuleDraft, Quiz};
use cursus::store::CourseEditor;
use cursus::utils::uploads::read_upload;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(about = "Admin CLI for managing Cursus course content", long_about = None)]
pub struct Cli {
    /// Course to operate on; falls back to app.course_id from the
    /// config file
    #[arg(long)]
    pub course: Option<Uuid>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the course outline with per-module stats
    Outline,

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        order: Option<i32>,
    },
    Rename {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        title: String,
    },
    /// Move a module to another module's position
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        target: Uuid,
    },
    Delete {
        #[arg(long)]
        id: Uuid,
        /// Confirm the deletion
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        /// Module to attach the lesson to
        #[arg(long)]
        module: Uuid,
        #[arg(long)]
        title: String,
        /// Human duration, e.g. "15m" or "1h 20m"
        #[arg(long)]
        duration: String,
        /// video, pdf, audio, file, text or quiz
        #[arg(long)]
        kind: ContentKind,
        /// Video reference for video lessons
        #[arg(long)]
        video_ref: Option<String>,
        /// Local file to upload for pdf/audio/file lessons
        #[arg(long)]
        file: Option<PathBuf>,
        /// Markdown file with the lesson body for text lessons
        #[arg(long)]
        body_file: Option<PathBuf>,
        /// JSON file with the quiz definition for quiz lessons
        #[arg(long)]
        quiz_file: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        published: bool,
    },
    /// Move a lesson to another lesson's position within its module
    Move {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        target: Uuid,
    },
    /// Publish the given lessons in one bulk action
    Publish {
        #[arg(long, required = true)]
        ids: Vec<Uuid>,
    },
    /// Unpublish the given lessons in one bulk action
    Unpublish {
        #[arg(long, required = true)]
        ids: Vec<Uuid>,
    },
    Delete {
        #[arg(long)]
        id: Uuid,
        /// Confirm the deletion
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> cursus::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let mut editor = cursus::build_editor().await?;
    let config = cursus::Config::get_or_init(cfg!(debug_assertions)).await;

    let Some(course) = args.course.or_else(|| config.app().course_id()) else {
        eprintln!("No course given; pass --course or set app.course_id in config.toml.");
        std::process::exit(2);
    };

    editor.refresh(course).await?;

    match args.command {
        Commands::Outline => print_outline(&editor),

        Commands::Module { action } => match action {
            ModuleCommands::Add { title, order } => {
                let mut draft = ModuleDraft::new(course, title);
                if let Some(order) = order {
                    draft = draft.with_order(order);
                }
                let id = editor.create_module(draft).await?;
                println!("Module created: {id}");
            }
            ModuleCommands::Rename { id, title } => {
                editor.update_module(id, ModuleDraft::new(course, title)).await?;
                println!("Module updated: {id}");
            }
            ModuleCommands::Move { id, target } => {
                editor.move_module(id, target)?;
                println!("Module moved: {id}");
            }
            ModuleCommands::Delete { id, yes } => {
                editor.delete_module(id, yes).await?;
                println!("Module deleted: {id}");
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add {
                module,
                title,
                duration,
                kind,
                video_ref,
                file,
                body_file,
                quiz_file,
                published,
            } => {
                let content =
                    build_content(&mut editor, kind, video_ref, file, body_file, quiz_file).await?;
                let draft =
                    LessonDraft::new(module, title, duration, content).with_published(published);
                let id = editor.create_lesson(draft).await?;
                println!("Lesson created: {id}");
            }
            LessonCommands::Move { id, target } => {
                editor.move_lesson(id, target)?;
                println!("Lesson moved: {id}");
            }
            LessonCommands::Publish { ids } => {
                for id in ids {
                    editor.toggle_selection(id)?;
                }
                editor.bulk_set_published(true);
                println!("Publishing queued.");
            }
            LessonCommands::Unpublish { ids } => {
                for id in ids {
                    editor.toggle_selection(id)?;
                }
                editor.bulk_set_published(false);
                println!("Unpublishing queued.");
            }
            LessonCommands::Delete { id, yes } => {
                editor.delete_lesson(id, yes).await?;
                println!("Lesson deleted: {id}");
            }
        },
    }

    editor.settle().await;
    if let Some(message) = editor.dismiss_banner() {
        eprintln!("sync warning: {message}");
    }
    editor.shutdown().await;

    Ok(())
}

/// Assemble the content payload for `lesson add`. Missing pieces become
/// empty payloads so draft validation reports the proper error.
async fn build_content(
    editor: &mut CourseEditor,
    kind: ContentKind,
    video_ref: Option<String>,
    file: Option<PathBuf>,
    body_file: Option<PathBuf>,
    quiz_file: Option<PathBuf>,
) -> cursus::error::AppResult<LessonContent> {
    let content = match kind {
        ContentKind::Video => LessonContent::Video {
            video_ref: video_ref.unwrap_or_default(),
        },
        ContentKind::Pdf | ContentKind::Audio | ContentKind::File => {
            let file_url = match file {
                Some(path) => {
                    let (filename, bytes) = read_upload(&path)?;
                    editor.upload_file(&filename, bytes).await?
                }
                None => String::new(),
            };
            match kind {
                ContentKind::Pdf => LessonContent::Pdf { file_url },
                ContentKind::Audio => LessonContent::Audio { file_url },
                _ => LessonContent::File { file_url },
            }
        }
        ContentKind::Text => LessonContent::Text {
            body: match body_file {
                Some(path) => std::fs::read_to_string(path)?,
                None => String::new(),
            },
        },
        ContentKind::Quiz => LessonContent::Quiz {
            quiz: match quiz_file {
                Some(path) => serde_json::from_str::<Quiz>(&std::fs::read_to_string(path)?)?,
                None => Quiz::new(vec![], 0),
            },
        },
    };
    Ok(content)
}

fn print_outline(editor: &CourseEditor) {
    let store = editor.store();
    for (module, lessons) in store.outline() {
        let stats = store
            .module_stats(module.id())
            .expect("module came from the outline");
        println!(
            "{} ({} lessons, {})",
            module.title(),
            stats.lesson_count,
            stats.formatted_duration()
        );
        for lesson in lessons {
            println!(
                "  {}. [{}] {} ({}){}",
                lesson.lesson_order(),
                lesson.kind(),
                lesson.title(),
                lesson.duration(),
                if lesson.published() { "" } else { " [draft]" }
            );
        }
    }
}
