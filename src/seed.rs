//! Development fixtures: wipes both tables and loads a small set of
//! tickets in assorted states, some with comment threads.

use tracing::info;

use crate::comments::models::Comment;
use crate::comments::repository as comments_repo;
use crate::shared::enums::{TicketPriority, TicketStatus};
use crate::shared::schema::{comments, tickets};
use crate::shared::utils::DbPool;
use crate::tickets::models::Ticket;
use crate::tickets::repository as tickets_repo;

use diesel::prelude::*;

struct Fixture {
    title: &'static str,
    description: &'static str,
    status: TicketStatus,
    priority: TicketPriority,
    comments: &'static [(&'static str, &'static str)],
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        title: "Cannot login to dashboard",
        description: "I am unable to login to my account dashboard. After entering my credentials, the page just refreshes without any error message. I have tried resetting my password but the issue persists.",
        status: TicketStatus::Open,
        priority: TicketPriority::High,
        comments: &[
            (
                "Support Agent",
                "Thank you for reporting this issue. We are looking into it and will update you shortly.",
            ),
            (
                "User",
                "Any update on this? I really need to access my dashboard urgently.",
            ),
        ],
    },
    Fixture {
        title: "Feature request: Dark mode support",
        description: "It would be great if the application supported a dark mode theme. Many users prefer dark mode for reduced eye strain, especially when working late at night. This is a common feature in modern applications.",
        status: TicketStatus::InProgress,
        priority: TicketPriority::Medium,
        comments: &[(
            "Product Manager",
            "Thanks for the suggestion! We have added this to our roadmap for the next quarter.",
        )],
    },
    Fixture {
        title: "Slow loading on mobile devices",
        description: "The application takes a very long time to load on mobile devices, particularly on 4G connections. The initial load can take up to 30 seconds, which is not acceptable for a good user experience. Desktop performance is fine.",
        status: TicketStatus::Resolved,
        priority: TicketPriority::High,
        comments: &[
            (
                "Developer",
                "We have identified the issue - large unoptimized images were causing the slow load times.",
            ),
            (
                "Developer",
                "Fixed in version 2.1.0. All images are now optimized and lazy-loaded.",
            ),
        ],
    },
    Fixture {
        title: "Email notifications not working",
        description: "I have enabled email notifications in my settings, but I am not receiving any emails for new messages, updates, or other activities. I have checked my spam folder and confirmed my email address is correct.",
        status: TicketStatus::Open,
        priority: TicketPriority::Medium,
        comments: &[],
    },
    Fixture {
        title: "Export data to CSV functionality",
        description: "Please add a feature to export all user data to CSV format. This would be helpful for data analysis and backup purposes. Currently, there is no way to bulk export data from the platform.",
        status: TicketStatus::Open,
        priority: TicketPriority::Low,
        comments: &[],
    },
    Fixture {
        title: "Payment processing error",
        description: "When trying to process a payment, I receive an error message saying \"Transaction failed - please try again later.\" This has happened multiple times over the past 24 hours. I have tried different cards and payment methods.",
        status: TicketStatus::InProgress,
        priority: TicketPriority::High,
        comments: &[(
            "Support Lead",
            "We are investigating this with our payment provider. Your issue has been escalated.",
        )],
    },
    Fixture {
        title: "Documentation needs updating",
        description: "The API documentation is outdated and references deprecated endpoints. Several code examples return 404 errors. Could you please update the documentation to reflect the current API version?",
        status: TicketStatus::Resolved,
        priority: TicketPriority::Low,
        comments: &[(
            "Technical Writer",
            "Documentation has been updated to v3.0. All examples have been tested and verified.",
        )],
    },
    Fixture {
        title: "Two-factor authentication setup issues",
        description: "I am trying to enable two-factor authentication but the QR code is not displaying properly. The page shows a broken image icon instead of the QR code. I have tried on different browsers with the same result.",
        status: TicketStatus::Open,
        priority: TicketPriority::Medium,
        comments: &[],
    },
];

pub fn run(pool: &DbPool) -> anyhow::Result<()> {
    let mut conn = pool.get()?;
    info!("seeding database");

    // Children first; no cascade is involved in a full wipe.
    diesel::delete(comments::table).execute(&mut conn)?;
    diesel::delete(tickets::table).execute(&mut conn)?;

    let mut comment_total = 0;
    for fixture in FIXTURES {
        let mut ticket = Ticket::new(
            fixture.title.to_string(),
            fixture.description.to_string(),
            fixture.priority,
        );
        ticket.status = fixture.status;
        tickets_repo::insert(&mut conn, &ticket)?;
        for (author, message) in fixture.comments {
            let comment = Comment::new(ticket.id, (*author).to_string(), (*message).to_string());
            comments_repo::insert(&mut conn, &comment)?;
            comment_total += 1;
        }
    }

    info!(
        tickets = FIXTURES.len(),
        comments = comment_total,
        "seed complete"
    );
    Ok(())
}
