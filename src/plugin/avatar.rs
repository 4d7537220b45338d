use crate::{
    event::*,
    helper::{error_embed, string_option, success_embed, CommandHelper},
    log_internal,
    plugin::*,
    storefront::{region_table, ProductRequest, Region, StorefrontClient, StorefrontError},
};
use anyhow::{anyhow, Result};
use serenity::all::{
    CommandOptionType, CreateCommandOption, CreateEmbed, CreateInteractionResponseFollowup,
};

const TOKEN_DESC: &str = "pdccws_p cookie";
const ID_DESC: &str = "ID from the product-id command";
const REGION_DESC: &str = "For example 'en-US', check 'playstation.com'";
const URL_DESC: &str = "Link to the game on psprices.com";

/// `/avatar`: availability checks and cart management on the PlayStation Store.
pub struct PluginAvatar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductAction {
    Check,
    Add,
    Remove,
}

#[derive(Debug, PartialEq, Eq)]
enum AvatarCommand {
    Product {
        action: ProductAction,
        session_token: String,
        product_id: String,
        region: String,
    },
    ProductId {
        url: String,
    },
}

impl AvatarCommand {
    /// Build from a subcommand name and a lookup of its string options.
    fn parse<'a>(subcommand: &str, option: impl Fn(&str) -> Option<&'a str>) -> Result<Self> {
        let required = |name: &str| {
            option(name)
                .map(str::to_owned)
                .ok_or(anyhow!("`/avatar {}` is missing `{}`", subcommand, name))
        };

        let action = match subcommand {
            "check" => ProductAction::Check,
            "add" => ProductAction::Add,
            "remove" => ProductAction::Remove,
            "product-id" => {
                return Ok(AvatarCommand::ProductId {
                    url: required("url")?,
                })
            }
            other => return Err(anyhow!("Unknown subcommand `/avatar {}`", other)),
        };

        Ok(AvatarCommand::Product {
            action,
            session_token: required("pdccws_p")?,
            product_id: required("product_id")?,
            region: required("region")?,
        })
    }
}

fn product_subcommand(name: &str, description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::SubCommand, name, description)
        .add_sub_option(
            CreateCommandOption::new(CommandOptionType::String, "pdccws_p", TOKEN_DESC)
                .required(true),
        )
        .add_sub_option(
            CreateCommandOption::new(CommandOptionType::String, "product_id", ID_DESC)
                .required(true),
        )
        .add_sub_option(
            CreateCommandOption::new(CommandOptionType::String, "region", REGION_DESC)
                .required(true),
        )
}

fn invalid_region_embed() -> CreateEmbed {
    error_embed(format!(
        "Invalid region, use one of:\n```{}```",
        region_table(10)
    ))
}

fn storefront_error_embed(err: &StorefrontError) -> CreateEmbed {
    log_internal!(
        "Storefront request failed ({}): {}",
        if err.is_retryable() { "retryable" } else { "final" },
        err
    );
    error_embed(err.to_string())
}

async fn run_product_action(
    storefront: &StorefrontClient,
    action: ProductAction,
    request: ProductRequest,
) -> CreateEmbed {
    let product_id = &request.product_id;
    let outcome = match action {
        ProductAction::Check => storefront
            .check_avatar(&request)
            .await
            .map(|image_url| success_embed("Avatar found!").image(image_url)),
        ProductAction::Add => storefront
            .add_to_cart(&request)
            .await
            .map(|()| success_embed(format!("{} added to cart", product_id))),
        ProductAction::Remove => storefront
            .remove_from_cart(&request)
            .await
            .map(|()| success_embed(format!("{} removed from cart", product_id))),
    };

    outcome.unwrap_or_else(|err| storefront_error_embed(&err))
}

#[serenity::async_trait]
impl Plugin for PluginAvatar {
    fn name(&self) -> &'static str {
        "avatar"
    }

    fn commands(&self) -> Vec<CreateCommand> {
        vec![CreateCommand::new(self.name())
            .description("PlayStation Store avatars")
            .add_option(product_subcommand("check", "Checks an avatar for you."))
            .add_option(product_subcommand(
                "add",
                "Adds the avatar you input into your cart.",
            ))
            .add_option(product_subcommand(
                "remove",
                "Removes the avatar you input from your cart.",
            ))
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::SubCommand,
                    "product-id",
                    "Finds the product ID of a psprices.com game.",
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::String, "url", URL_DESC)
                        .required(true),
                ),
            )]
    }

    async fn handle(&self, ctx: &Context<'_>, event: &Event) -> Result<EventHandled> {
        let Some(command) = event.is_command(self.name()) else {
            return Ok(EventHandled::No);
        };

        let avatar_command = {
            let (subcommand, options) = command
                .subcommand()
                .ok_or(anyhow!("`/{}` invoked without a subcommand", self.name()))?;
            AvatarCommand::parse(subcommand, |name| string_option(&options, name))?
        };

        // Store round trips can take a while; acknowledge first.
        command.defer_ephemeral(ctx.cache_http).await?;

        let embed = match avatar_command {
            AvatarCommand::Product {
                action,
                session_token,
                product_id,
                region,
            } => match Region::parse(&region) {
                Ok(region) => {
                    let request = ProductRequest::new(session_token, region, product_id);
                    run_product_action(ctx.storefront, action, request).await
                }
                Err(_) => invalid_region_embed(),
            },
            AvatarCommand::ProductId { url } => {
                match ctx.storefront.product_id_from_psprices(&url).await {
                    Ok(product_id) => success_embed(format!("Product ID: `{}`", product_id)),
                    Err(err) => storefront_error_embed(&err),
                }
            }
        };

        command
            .create_followup(
                ctx.cache_http,
                CreateInteractionResponseFollowup::new()
                    .embed(embed)
                    .ephemeral(true),
            )
            .await?;
        Ok(EventHandled::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(subcommand: &str, options: &[(&'static str, &'static str)]) -> Result<AvatarCommand> {
        let options: HashMap<&str, &'static str> = options.iter().copied().collect();
        AvatarCommand::parse(subcommand, |name| options.get(name).copied())
    }

    #[test]
    fn parses_product_subcommands() {
        let options = [
            ("pdccws_p", "abc"),
            ("product_id", "EP1234-ABCD00001_00-0000000000000000"),
            ("region", "en-US"),
        ];

        for (name, action) in [
            ("check", ProductAction::Check),
            ("add", ProductAction::Add),
            ("remove", ProductAction::Remove),
        ] {
            assert_eq!(
                parse(name, &options).unwrap(),
                AvatarCommand::Product {
                    action,
                    session_token: "abc".to_string(),
                    product_id: "EP1234-ABCD00001_00-0000000000000000".to_string(),
                    region: "en-US".to_string(),
                }
            );
        }
    }

    #[test]
    fn parses_product_id_subcommand() {
        assert_eq!(
            parse("product-id", &[("url", "https://psprices.com/game/1")]).unwrap(),
            AvatarCommand::ProductId {
                url: "https://psprices.com/game/1".to_string()
            }
        );
    }

    #[test]
    fn missing_option_names_it() {
        let err = parse("add", &[("pdccws_p", "abc"), ("region", "en-US")]).unwrap_err();
        assert!(err.to_string().contains("product_id"));
    }

    #[test]
    fn unknown_subcommand_is_an_error() {
        assert!(parse("buy", &[]).is_err());
    }

    #[test]
    fn every_subcommand_is_registered() {
        let registered = serde_json::to_value(&PluginAvatar.commands()[0]).unwrap();
        let names: Vec<&str> = registered["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|option| option["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["check", "add", "remove", "product-id"]);
    }
}
