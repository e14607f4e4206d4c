use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::core::errors::{Result, RollcallError};
use crate::core::models::community::{Channel, Community};
use crate::core::models::ids::{ChannelId, GuildId, UserId};
use crate::core::models::message::MessageStamp;
use crate::core::models::snowflake::Snowflake;
use crate::core::traits::directory::CommunityDirectory;
use crate::core::traits::history::HistorySource;
use crate::core::traits::resolver::NameResolver;
use crate::core::traits::roster::MemberRoster;

use super::payloads::{
    ApiChannel, ApiGuild, ApiGuildDetail, ApiMember, ApiMessage, ApiOverwrite, ApiRateLimit,
    ApiUser,
};
use super::permissions::{self, GuildAccess};

/// Page size for `/users/@me/guilds`, the platform maximum.
const PAGE_GUILDS: usize = 200;

/// Page size for `/guilds/{id}/members`, the platform maximum.
const PAGE_MEMBERS: usize = 1000;

/// How many times a single request is retried after HTTP 429 before
/// the rate limit is surfaced as a transport failure.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Fallback wait when a 429 body carries no usable `retry_after`.
const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(1);

/// All four crawl ports backed by the Discord REST API (v10).
///
/// One instance serves a whole crawl: guild permission contexts,
/// channel overwrites, and display names are cached per process so the
/// post-crawl name resolution rarely costs extra round-trips.
#[derive(Debug)]
pub struct DiscordRest {
    http: reqwest::Client,
    api_base: String,
    token: String,
    self_user: ApiUser,
    name_cache: Mutex<HashMap<UserId, String>>,
    access_cache: Mutex<HashMap<GuildId, GuildAccess>>,
    overwrite_cache: Mutex<HashMap<ChannelId, Vec<ApiOverwrite>>>,
}

/// Build a reqwest client with the given timeout.
fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(format!("rollcall/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RollcallError::ApiRequest {
            context: "creating the HTTP client".into(),
            reason: e.to_string(),
        })
}

impl DiscordRest {
    /// Authenticate against the API and learn the bot's own identity.
    ///
    /// Fails fast on a bad token instead of letting the first crawl
    /// request discover it.
    pub async fn connect(api_base: &str, token: String, timeout: Duration) -> Result<Self> {
        let mut gateway = Self {
            http: build_client(timeout)?,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            self_user: ApiUser {
                id: Snowflake::new(0),
                username: String::new(),
                discriminator: None,
                global_name: None,
                bot: true,
            },
            name_cache: Mutex::new(HashMap::new()),
            access_cache: Mutex::new(HashMap::new()),
            overwrite_cache: Mutex::new(HashMap::new()),
        };
        gateway.self_user = gateway
            .get_json("/users/@me", "verifying the bot token")
            .await?;
        Ok(gateway)
    }

    /// The authenticated bot's display name, for the connect banner.
    pub fn bot_name(&self) -> String {
        self.self_user.display_name()
    }

    /// Authenticated GET returning a deserialized body.
    ///
    /// HTTP 429 is retried a bounded number of times, honoring the
    /// `retry_after` the platform sends; every other non-success status
    /// surfaces immediately with its body as detail.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        context: &str,
    ) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        let mut rate_limited = 0;

        loop {
            let response = self
                .http
                .get(&url)
                .header("Authorization", format!("Bot {}", self.token))
                .send()
                .await
                .map_err(|e| RollcallError::ApiRequest {
                    context: context.to_string(),
                    reason: e.to_string(),
                })?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS
                && rate_limited < MAX_RATE_LIMIT_RETRIES
            {
                rate_limited += 1;
                let wait = match response.json::<ApiRateLimit>().await {
                    Ok(body) => Duration::try_from_secs_f64(body.retry_after)
                        .unwrap_or(DEFAULT_RATE_LIMIT_WAIT),
                    Err(_) => DEFAULT_RATE_LIMIT_WAIT,
                };
                tokio::time::sleep(wait).await;
                continue;
            }

            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(RollcallError::ApiStatus {
                    context: context.to_string(),
                    status: status.as_u16(),
                    detail,
                });
            }

            return response
                .json::<T>()
                .await
                .map_err(|e| RollcallError::InvalidPayload {
                    context: context.to_string(),
                    reason: e.to_string(),
                });
        }
    }

    /// Fetch (or reuse) everything needed to evaluate channel
    /// permissions in one guild: its roles and owner, plus the bot's
    /// own role set there.
    async fn guild_access(&self, guild: GuildId) -> Result<GuildAccess> {
        if let Some(access) = self.access_cache.lock().await.get(&guild) {
            return Ok(access.clone());
        }

        let detail: ApiGuildDetail = self
            .get_json(&format!("/guilds/{guild}"), "fetching community details")
            .await?;
        let own_membership: ApiMember = self
            .get_json(
                &format!("/guilds/{guild}/members/@me"),
                "fetching own membership",
            )
            .await?;

        let access = GuildAccess {
            guild: detail.id,
            owner_id: detail.owner_id,
            role_permissions: detail
                .roles
                .into_iter()
                .map(|role| (role.id, role.permissions))
                .collect(),
            own_roles: own_membership.roles,
        };
        self.access_cache.lock().await.insert(guild, access.clone());
        Ok(access)
    }
}

impl CommunityDirectory for DiscordRest {
    async fn communities(&self) -> Result<Vec<Community>> {
        let mut communities = Vec::new();
        let mut after: Option<Snowflake> = None;

        loop {
            let path = match after {
                Some(id) => format!("/users/@me/guilds?limit={PAGE_GUILDS}&after={id}"),
                None => format!("/users/@me/guilds?limit={PAGE_GUILDS}"),
            };
            let page: Vec<ApiGuild> = self.get_json(&path, "listing communities").await?;
            let full_page = page.len() == PAGE_GUILDS;
            after = page.last().map(|guild| guild.id);

            communities.extend(page.into_iter().map(|guild| Community {
                id: GuildId(guild.id),
                name: guild.name,
            }));

            if !full_page {
                break;
            }
        }
        Ok(communities)
    }

    async fn channels(&self, guild: GuildId) -> Result<Vec<Channel>> {
        let all: Vec<ApiChannel> = self
            .get_json(&format!("/guilds/{guild}/channels"), "listing channels")
            .await?;

        let mut channels = Vec::new();
        let mut overwrites = self.overwrite_cache.lock().await;
        for api in all {
            if !api.is_text() {
                continue;
            }
            let id = ChannelId(api.id);
            overwrites.insert(id, api.permission_overwrites);
            channels.push(Channel {
                id,
                guild_id: guild,
                name: api.name.unwrap_or_default(),
            });
        }
        Ok(channels)
    }

    async fn can_read_history(&self, channel: &Channel) -> Result<bool> {
        let access = self.guild_access(channel.guild_id).await?;
        let overwrites = self
            .overwrite_cache
            .lock()
            .await
            .get(&channel.id)
            .cloned()
            .unwrap_or_default();

        let me = UserId(self.self_user.id);
        let base = access.base_permissions(me);
        let effective = access.channel_permissions(me, base, &overwrites);
        Ok(permissions::can_read_history(effective))
    }
}

impl MemberRoster for DiscordRest {
    async fn members(&self, guild: GuildId) -> Result<Vec<UserId>> {
        let mut members = Vec::new();
        let mut after: Option<Snowflake> = None;

        loop {
            let path = match after {
                Some(id) => format!("/guilds/{guild}/members?limit={PAGE_MEMBERS}&after={id}"),
                None => format!("/guilds/{guild}/members?limit={PAGE_MEMBERS}"),
            };
            let page: Vec<ApiMember> = self.get_json(&path, "listing members").await?;
            let full_page = page.len() == PAGE_MEMBERS;
            after = page.last().map(|member| member.user.id);

            // Seed the name cache while the user objects are in hand;
            // post-crawl resolution then rarely needs the network.
            let mut names = self.name_cache.lock().await;
            for entry in page {
                let user = entry.user;
                names.insert(UserId(user.id), user.display_name());
                if !user.bot {
                    members.push(UserId(user.id));
                }
            }

            if !full_page {
                break;
            }
        }
        Ok(members)
    }
}

impl HistorySource for DiscordRest {
    async fn messages_before(
        &self,
        channel: ChannelId,
        before: Snowflake,
        limit: u8,
    ) -> Result<Vec<MessageStamp>> {
        let path = format!("/channels/{channel}/messages?before={before}&limit={limit}");
        let page: Vec<ApiMessage> = self.get_json(&path, "fetching message history").await?;
        Ok(page
            .into_iter()
            .map(|message| MessageStamp {
                id: message.id,
                author: UserId(message.author.id),
                author_is_bot: message.author.bot,
            })
            .collect())
    }
}

impl NameResolver for DiscordRest {
    async fn display_name(&self, user: UserId) -> Result<String> {
        if let Some(name) = self.name_cache.lock().await.get(&user) {
            return Ok(name.clone());
        }

        let fetched: ApiUser = self
            .get_json(&format!("/users/{user}"), "resolving a member name")
            .await?;
        let name = fetched.display_name();
        self.name_cache.lock().await.insert(user, name.clone());
        Ok(name)
    }
}
