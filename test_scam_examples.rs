#![allow(clippy::uninlined_format_args)]

use scam_scanner::verdict::classify;
use scam_scanner::{RuleSet, Scanner, SenderTag};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("Testing sample messages against the embedded rule set...");

    let scanner = Scanner::new(RuleSet::embedded()?);

    let samples = [
        (
            "Send your OTP now or your account will be suspended",
            SenderTag::Unknown,
        ),
        ("Hey, are we still meeting for lunch?", SenderTag::Friend),
        (
            "Congratulations! You have won KSH 50,000 from Safaricom. Tuma pesa ya usajili KSH 200 to M-PESA till number 556677 haraka to claim",
            SenderTag::Unknown,
        ),
        (
            "Your HELB loan approved. Pay processing fee via mpesa to receive funds leo",
            SenderTag::WhatsappGroup,
        ),
        (
            "Earn $500 daily working from home, no experience needed! Click here: bit.ly/job123",
            SenderTag::SocialMedia,
        ),
        (
            "Hi mum, my phone broke. This is my new number, please send money for a new one",
            SenderTag::Unknown,
        ),
        ("Happy birthday auntie! See you at dinner", SenderTag::Family),
        ("Your parcel will be delivered tomorrow", SenderTag::Official),
    ];

    for (text, sender) in &samples {
        let result = scanner.analyze(text, *sender);
        let verdict = classify(result.risk_score, *sender);

        println!();
        println!("Message: {}", text);
        println!("Sender: {}", sender);
        println!(
            "Verdict: {} (risk {}%, confidence {}%)",
            verdict.label, result.risk_score, result.confidence
        );
        for reason in &result.scam_reasons {
            println!("  - {}", reason);
        }
        for reason in &result.safe_reasons {
            println!("  + {}", reason);
        }
    }

    Ok(())
}
