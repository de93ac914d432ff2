use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{CatalogView, ExamView, SectionView};
use crate::vm::map_catalog;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CatalogView)] Catalog {},
        #[route("/section/:slug", SectionView)] Section { slug: String },
        #[route("/exam/:slug", ExamView)] Exam { slug: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let vm = map_catalog(&ctx.catalog());
    rsx! {
        nav { class: "sidebar",
            h1 { "Course" }
            ul {
                li { Link { to: Route::Catalog {}, "Contents" } }
                for entry in vm.sections {
                    li { key: "{entry.slug}",
                        Link { to: Route::Section { slug: entry.slug.clone() }, "{entry.title}" }
                    }
                }
                for exam in vm.exams {
                    li { key: "exam-{exam.slug}",
                        Link { to: Route::Exam { slug: exam.slug.clone() }, "{exam.title}" }
                    }
                }
            }
        }
    }
}
